// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `side tags` lookup and jump-back navigation.

use crate::prelude::*;

const MAIN: &str = "\
void blink();

int main() {
    blink();
}

void blink() {
}

void blinker() {
}
";

fn tagged_project() -> Project {
    let p = Project::with_files(&["main.c"]);
    p.file("main.c", MAIN);
    p.file(
        "tags",
        "!_TAG_FILE_FORMAT\t1\t/original ctags format/\n\
         blinker\tmain.c\t/^void blinker() {$/\n\
         blink\tmain.c\t/^void blink() {$/\n\
         main\tmain.c\t3\n",
    );
    p
}

#[test]
fn find_prints_definition_location() {
    let p = tagged_project();
    let file = p.src().join("main.c");

    p.side()
        .args(&["tags", "find", "blink.side", "blink"])
        .passes()
        .stdout_eq(&format!("{}:7\n", file.display()));
    p.side()
        .args(&["tags", "find", "blink.side", "main"])
        .passes()
        .stdout_eq(&format!("{}:3\n", file.display()));
}

#[test]
fn find_json_includes_tag_line() {
    let p = tagged_project();

    let run = p.side().args(&["tags", "find", "blink.side", "blinker", "-o", "json"]).passes();
    let json = run.json();
    assert_eq!(json["tag"], "blinker\tmain.c\t/^void blinker() {$/");
    assert_eq!(json["location"]["line"], 9);
}

#[test]
fn unknown_symbol_exits_with_miss_code() {
    let p = tagged_project();

    p.side().args(&["tags", "find", "blink.side", "blin"]).exits_with(2).stderr_has("tag not found");
}

#[test]
fn missing_index_exits_with_miss_code() {
    let p = Project::with_files(&["main.c"]);

    p.side().args(&["tags", "find", "blink.side", "main"]).exits_with(2).stderr_has("tags build");
}

#[test]
fn jump_and_back_are_last_in_first_out() {
    let p = tagged_project();
    let file = p.src().join("main.c").display().to_string();

    p.side()
        .args(&["tags", "jump", "blink.side", "blink", "--from", format!("{file}:4").as_str()])
        .passes()
        .stdout_eq(&format!("{file}:7\n"));
    p.side()
        .args(&["tags", "jump", "blink.side", "blinker", "--from", format!("{file}:7").as_str()])
        .passes();

    p.side().args(&["tags", "back", "blink.side"]).passes().stdout_eq(&format!("{file}:7\n"));
    p.side().args(&["tags", "back", "blink.side"]).passes().stdout_eq(&format!("{file}:4\n"));
    p.side().args(&["tags", "back", "blink.side"]).exits_with(2).stderr_has("tag stack is empty");
}

#[test]
fn clear_empties_stack() {
    let p = tagged_project();

    p.side().args(&["tags", "jump", "blink.side", "main"]).passes();
    p.side().args(&["tags", "clear", "blink.side"]).passes();
    p.side().args(&["tags", "back", "blink.side"]).exits_with(2);
}

#[test]
fn build_runs_generator_over_project_files() {
    let p = Project::with_files(&["main.c", "lib.h"]);
    p.file("main.c", MAIN);
    p.tool("ctags", "printf 'main\\tmain.c\\t3\\n' > tags");

    p.side().args(&["tags", "build", "blink.side"]).passes().stdout_has("Tags written to");

    let src = p.src();
    assert_eq!(
        p.calls(),
        vec![format!(
            "ctags --format=1 {} {}",
            src.join("main.c").display(),
            src.join("lib.h").display()
        )]
    );
    p.side().args(&["tags", "find", "blink.side", "main"]).passes().stdout_has("main.c:3");
}

#[test]
fn build_without_generator_fails() {
    let p = Project::with_files(&["main.c"]);

    p.side().args(&["tags", "build", "blink.side"]).exits_with(1).stderr_has("tag generator not found");
}
