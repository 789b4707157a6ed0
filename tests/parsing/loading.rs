#[cfg(test)]
mod verify {
    use std::path::{Path, PathBuf};

    use pacer::language::*;
    use pacer::parsing;

    fn fixture(name: &str) -> PathBuf {
        Path::new("tests/fixtures").join(name)
    }

    fn parse_fixture(name: &str) -> ScenarioSet {
        let filename = fixture(name);
        let content = parsing::load(&filename)
            .unwrap_or_else(|error| panic!("{}: {}", filename.display(), error));
        match parsing::parse(&filename, &content) {
            Ok(set) => set,
            Err(error) => panic!("{}", error.full_details()),
        }
    }

    /// Parse content as if it lived in the fixtures directory, so `load`
    /// statements resolve relative to it.
    fn parse_alongside_fixtures(content: &str) -> ScenarioSet {
        let filename = fixture("virtual.pace");
        match parsing::parse(&filename, content) {
            Ok(set) => set,
            Err(error) => panic!("{}", error.full_details()),
        }
    }

    #[test]
    fn loaded_groups_are_available_to_include() {
        let set = parse_fixture("main.pace");

        assert_eq!(set.len(), 1);
        assert!(set
            .groups
            .contains_key("homepage"));
        assert!(set
            .groups
            .contains_key("login"));

        let scenario = &set.scenarios[0];
        assert_eq!(scenario.key, "Admin");

        // one step copied out of the homepage group, one of its own
        assert_eq!(
            scenario
                .steps
                .len(),
            2
        );
        match &scenario.steps[0].kind {
            StepKind::Visit { url } => assert_eq!(url.raw, "url('/')"),
            other => panic!("expected a visit, got {:?}", other),
        }
        match &scenario.steps[1].kind {
            StepKind::Visit { url } => assert_eq!(url.raw, "url('/admin')"),
            other => panic!("expected a visit, got {:?}", other),
        }
    }

    #[test]
    fn include_produces_independent_copies() {
        let mut set = parse_alongside_fixtures(
            "group pair\n    visit url('/a')\n    visit url('/b')\n\n\
             scenario One\n    include pair\n\n\
             scenario Two\n    include pair\n",
        );

        assert_eq!(set.len(), 2);
        assert_eq!(set.scenarios[0].steps, set.scenarios[1].steps);

        // mutating one expansion must leave the other, and the group
        // template itself, untouched
        set.scenarios[0].steps[0].samples = Some(99);
        assert_eq!(set.scenarios[1].steps[0].samples, None);
        match &set.groups["pair"].entries[0] {
            GroupEntry::Step(step) => assert_eq!(step.samples, None),
            other => panic!("expected a step entry, got {:?}", other),
        }
    }

    #[test]
    fn mutual_loads_are_rejected() {
        let filename = fixture("cycle_a.pace");
        let content = parsing::load(&filename)
            .unwrap_or_else(|error| panic!("{}: {}", filename.display(), error));

        let error = parsing::parse(&filename, &content).unwrap_err();
        assert_eq!(error.problem, "error in loaded file");

        let mut innermost = &error;
        while let Some(cause) = innermost
            .cause
            .as_deref()
        {
            innermost = cause;
        }
        assert_eq!(innermost.problem, "circular load");
        assert!(innermost
            .filename
            .ends_with("cycle_b.pace"));
    }

    #[test]
    fn later_group_definitions_win() {
        let set = parse_alongside_fixtures(
            "group home\n    visit url('/local')\n\n\
             load \"override.pace\"\n\n\
             scenario\n    include home\n",
        );

        let scenario = &set.scenarios[0];
        match &scenario.steps[0].kind {
            StepKind::Visit { url } => assert_eq!(url.raw, "url('/override')"),
            other => panic!("expected a visit, got {:?}", other),
        }
    }

    #[test]
    fn loaded_scenarios_append_after_those_already_parsed() {
        let set = parse_alongside_fixtures(
            "scenario First\n    reload\n\n\
             load \"appended.pace\"\n\n\
             scenario Last\n    reload\n",
        );

        let keys: Vec<&str> = set
            .iter()
            .map(|scenario| scenario.key.as_str())
            .collect();
        assert_eq!(keys, vec!["First", "Loaded", "Last"]);

        // globals merged by the load are visible to scenarios after it,
        // not to ones already built
        assert!(!set.scenarios[0]
            .variables
            .contains_key("origin"));
        assert_eq!(set.scenarios[2].variables["origin"].raw, "'loaded'");
    }
}
