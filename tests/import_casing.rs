use std::fs;
use std::path::Path;

use casefix::{run, CasefixConfig, RunOptions, SourceTree};
use tempfile::TempDir;

fn write(root: &Path, file: &str, content: &str) {
    let path = root.join(file);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn read(root: &Path, file: &str) -> String {
    fs::read_to_string(root.join(file)).unwrap()
}

fn fix_tree(root: &Path) -> casefix::RunSummary {
    let tree = SourceTree::open(root, CasefixConfig::default()).unwrap();
    run(&tree, RunOptions::default()).unwrap()
}

#[test]
fn corrects_extensionless_and_explicit_imports() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "utils/Helper.ts", "export const helper = 1;\n");
    write(
        root,
        "App.tsx",
        "import { helper } from './Utils/helper';\nimport same from \"./Utils/helper.ts\";\n",
    );

    let summary = fix_tree(root);

    assert_eq!(summary.fixes.len(), 2);
    assert_eq!(
        read(root, "App.tsx"),
        "import { helper } from './utils/Helper';\nimport same from \"./utils/Helper.ts\";\n"
    );
}

#[test]
fn second_run_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "utils/Helper.ts", "");
    write(root, "Components/Index.tsx", "");
    write(root, "assets/Icon.svg", "");
    write(
        root,
        "pages/Home.tsx",
        "import h from '../Utils/helper';\n\
         import C from '../components';\n\
         import icon from '../Assets/icon.svg?raster';\n\
         const again = require('../Utils/helper');\n",
    );

    let first = fix_tree(root);
    assert_eq!(first.fixes.len(), 4);
    let after_first = read(root, "pages/Home.tsx");

    let second = fix_tree(root);
    assert!(second.fixes.is_empty());
    assert_eq!(second.files_changed, 0);
    assert_eq!(read(root, "pages/Home.tsx"), after_first);
}

#[test]
fn bare_imports_are_never_touched() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "react/index.js", "");
    write(root, "Lodash.ts", "");
    let source = "import React from 'REACT';\nimport _ from 'lodash';\n";
    write(root, "App.tsx", source);

    let summary = fix_tree(root);

    assert!(summary.fixes.is_empty());
    assert_eq!(read(root, "App.tsx"), source);
}

#[test]
fn broken_imports_are_left_as_written() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let source = "import gone from './Missing/thing';\nrequire('../outside/root');\n";
    write(root, "App.tsx", source);

    let summary = fix_tree(root);

    assert!(summary.fixes.is_empty());
    assert_eq!(read(root, "App.tsx"), source);
}

#[test]
fn directory_index_gets_real_casing() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "Components/Index.tsx", "");
    write(root, "App.tsx", "import Components from './Components';\n");

    fix_tree(root);

    assert_eq!(
        read(root, "App.tsx"),
        "import Components from './Components/Index';\n"
    );
}

#[test]
fn correct_files_are_not_rewritten() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "utils/Helper.ts", "");
    write(root, "hooks/index.ts", "");
    let source = "import h from './utils/Helper';\nimport hooks from './hooks';\n";
    write(root, "App.tsx", source);
    let before = fs::metadata(root.join("App.tsx"))
        .unwrap()
        .modified()
        .unwrap();

    let summary = fix_tree(root);

    assert_eq!(summary.files_changed, 0);
    assert!(!summary.applied);
    assert_eq!(read(root, "App.tsx"), source);
    let after = fs::metadata(root.join("App.tsx"))
        .unwrap()
        .modified()
        .unwrap();
    assert_eq!(before, after);
}

#[test]
fn exact_imports_keep_their_target() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "button/index.js", "");
    write(root, "Button.js", "");
    write(root, "Modal.ts", "");
    write(root, "modal.jsx", "");
    let source = "import b from './button';\nimport m from './Modal';\n";
    write(root, "App.tsx", source);

    let summary = fix_tree(root);

    assert!(summary.fixes.is_empty());
    assert_eq!(summary.files_changed, 0);
    assert_eq!(read(root, "App.tsx"), source);
}

#[test]
fn query_suffix_survives_correction() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "Icon.svg", "<svg/>");
    write(root, "App.tsx", "import icon from './icon.svg?raster';\n");

    fix_tree(root);

    assert_eq!(
        read(root, "App.tsx"),
        "import icon from './Icon.svg?raster';\n"
    );
}

#[test]
fn repeated_identical_imports_each_fixed_once() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "Button.tsx", "");
    write(
        root,
        "App.tsx",
        "import A from './button';\nimport B from './button';\nimport C from './button';\n",
    );

    let summary = fix_tree(root);

    assert_eq!(summary.fixes.len(), 3);
    assert_eq!(
        read(root, "App.tsx"),
        "import A from './Button';\nimport B from './Button';\nimport C from './Button';\n"
    );
}

#[test]
fn missing_root_is_fatal() {
    let dir = TempDir::new().unwrap();
    let err = SourceTree::open(&dir.path().join("src"), CasefixConfig::default()).unwrap_err();
    assert_eq!(err.code.as_str(), "source.root_not_found");
}
