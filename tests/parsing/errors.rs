#[cfg(test)]
mod syntax {
    use std::path::Path;

    use pacer::error::PacerError;
    use pacer::parsing;

    /// Helper asserting that parsing fails with the given problem text.
    fn expect_problem(content: &str, problem: &str) -> PacerError {
        match parsing::parse(Path::new("test.pace"), content) {
            Ok(_) => panic!(
                "Expected parsing to fail, but it succeeded for input: {}",
                content
            ),
            Err(error) => {
                assert_eq!(error.problem, problem, "for input '{}'", content);
                error
            }
        }
    }

    #[test]
    fn unknown_statement() {
        let error = expect_problem(
            "scenario\n    teleport url('/')\n",
            "unknown statement 'teleport'",
        );
        assert_eq!(error.line(), 2);
        assert_eq!(error.column(), 5);
    }

    #[test]
    fn tab_indentation() {
        expect_problem("scenario\n\treload\n", "tab in indentation");
    }

    #[test]
    fn inconsistent_indentation() {
        // the first indented line establishes a three column unit; five
        // columns later on fits no whole number of levels
        let error = expect_problem(
            "scenario\n   visit url('/')\n     expect true\n",
            "inconsistent indentation",
        );
        assert_eq!(error.line(), 3);
    }

    #[test]
    fn unterminated_string() {
        let error = expect_problem("set env \"prod\n", "unterminated string");
        assert_eq!(error.line(), 1);
        assert_eq!(error.column(), 9);
    }

    #[test]
    fn unbalanced_parentheses() {
        expect_problem(
            "scenario\n    visit url('/'\n",
            "unbalanced parentheses",
        );
    }

    #[test]
    fn comparison_outside_expect() {
        expect_problem(
            "scenario\n    visit url('/')\n        wait 1 == 2\n",
            "comparison not allowed here",
        );
    }

    #[test]
    fn missing_value() {
        expect_problem("set env\n", "missing required value");
        expect_problem("scenario\n    visit\n", "missing required value");
    }

    #[test]
    fn keyword_out_of_place() {
        expect_problem("expect true\n", "'expect' is not allowed here");
        expect_problem(
            "scenario\n    samples 10\n",
            "'samples' is not allowed here",
        );
    }

    #[test]
    fn unknown_group_is_named() {
        let error = expect_problem(
            "scenario\n    include UNDEFINED\n",
            "unknown group 'UNDEFINED'",
        );
        assert_eq!(error.line(), 2);
    }

    #[test]
    fn unresolvable_load() {
        expect_problem(
            "load \"missing.pace\"\n",
            "cannot load 'missing.pace'",
        );
    }
}
