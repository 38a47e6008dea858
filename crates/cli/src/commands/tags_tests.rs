// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    first_line = { "main.c:1", "main.c", 0 },
    later_line = { "src/lib.c:42", "src/lib.c", 41 },
    zero_line = { "main.c:0", "main.c", 0 },
)]
fn location_flag_is_one_based(input: &str, file: &str, line: usize) {
    let location = parse_location(input).unwrap();
    assert_eq!(location, TagLocation { file: PathBuf::from(file), line });
}

#[parameterized(
    no_colon = { "main.c" },
    bad_number = { "main.c:x" },
)]
fn bad_location_flag_is_rejected(input: &str) {
    assert!(parse_location(input).is_err());
}

#[test]
fn misses_exit_with_tag_miss_code() {
    let err = lookup_error(TagError::TagIndexMissing(PathBuf::from("/p/tags")));
    let exit = err.downcast_ref::<ExitError>().unwrap();
    assert_eq!(exit.code, crate::exit_error::TAG_MISS);
    assert!(exit.message.contains("/p/tags"));
}

#[test]
fn operational_errors_are_not_misses() {
    let err = lookup_error(TagError::SymbolFileMissing(PathBuf::from("gone.c")));
    assert!(err.downcast_ref::<ExitError>().is_none());
}
