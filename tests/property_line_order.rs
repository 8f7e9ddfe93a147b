#![cfg(unix)]

mod common;
use crate::common::fast_config;

use proptest::prelude::*;

use procrun::exec::{CommandSpec, Supervisor};

/// `printf '%s\n' "$@"` echoes each argument as one line.
fn print_each(lines: &[String]) -> CommandSpec {
    let mut argv = vec![
        "sh".to_string(),
        "-c".to_string(),
        "printf '%s\\n' \"$@\"".to_string(),
        "sh".to_string(),
    ];
    argv.extend(lines.iter().cloned());
    CommandSpec::new(argv)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn collected_lines_match_emitted_lines(
        lines in proptest::collection::vec("[a-zA-Z0-9 ,.:_-]{0,40}", 1..60)
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let result = rt
            .block_on(Supervisor::new(fast_config()).output(&print_each(&lines)))
            .unwrap();

        prop_assert_eq!(result.exit_code, 0);
        prop_assert_eq!(result.replaced_lines, 0);
        prop_assert_eq!(result.lines, lines);
    }
}
