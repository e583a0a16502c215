pub type CmdResult<T> = casefix::Result<(T, i32)>;

pub mod fix;
