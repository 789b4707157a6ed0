#[cfg(test)]
mod verify {
    use std::path::Path;

    use pacer::language::*;
    use pacer::parsing;

    fn trim(s: &str) -> &str {
        s.strip_prefix('\n')
            .unwrap_or(s)
    }

    fn parse(content: &str) -> ScenarioSet {
        match parsing::parse(Path::new("test.pace"), content) {
            Ok(set) => set,
            Err(error) => panic!("{}", error.full_details()),
        }
    }

    #[test]
    fn separated_scenarios() {
        let set = parse(trim(
            r#"
scenario Test 1
    set env "prod"
    endpoint 'http://toto.com'

    # A comment
    visit url('/blog/')
        expect "prod" == env

scenario Test2
    reload
            "#,
        ));

        assert_eq!(set.len(), 2);

        let scenario = &set.scenarios[0];
        assert_eq!(scenario.key, "Test 1");

        let names: Vec<&String> = scenario
            .variables
            .keys()
            .collect();
        assert_eq!(names, vec!["env", "endpoint"]);
        assert_eq!(scenario.variables["env"].raw, r#""prod""#);
        assert_eq!(scenario.variables["endpoint"].raw, "'http://toto.com'");

        let step = scenario
            .block_step()
            .unwrap();
        match &step.kind {
            StepKind::Visit { url } => assert_eq!(url.raw, "url('/blog/')"),
            other => panic!("expected a visit, got {:?}", other),
        }

        assert_eq!(step.expects.len(), 1);
        assert_eq!(step.expects[0].raw, r#""prod" == env"#);
        match &step.expects[0].kind {
            ExpressionKind::Compare { left, op, right } => {
                assert_eq!(left.kind, ExpressionKind::String("prod".to_string()));
                assert_eq!(op, "==");
                assert_eq!(right.kind, ExpressionKind::Variable("env".to_string()));
            }
            other => panic!("expected a comparison, got {:?}", other),
        }

        let scenario = &set.scenarios[1];
        assert_eq!(scenario.key, "Test2");
        assert!(scenario
            .variables
            .is_empty());
        let step = scenario
            .block_step()
            .unwrap();
        assert_eq!(step.kind, StepKind::Reload);
    }

    #[test]
    fn global_configuration_reaches_every_scenario() {
        let set = parse(trim(
            r#"
set env "prod"
endpoint 'http://toto.com'

scenario Test 1
    # A comment
    visit url('/blog/')
        header "Accept-Language: en-US"
        samples 10
        expect "prod" == env

scenario Test2
    reload
            "#,
        ));

        assert_eq!(set.len(), 2);

        let scenario = &set.scenarios[0];
        assert_eq!(scenario.key, "Test 1");
        assert_eq!(scenario.variables["env"].raw, r#""prod""#);
        assert_eq!(scenario.variables["endpoint"].raw, "'http://toto.com'");

        let step = scenario
            .block_step()
            .unwrap();
        let headers: Vec<&str> = step
            .headers
            .iter()
            .map(|header| header.raw())
            .collect();
        assert_eq!(headers, vec![r#""Accept-Language: en-US""#]);
        assert_eq!(step.samples, Some(10));

        // the second scenario was seeded with the same globals
        let scenario = &set.scenarios[1];
        assert_eq!(scenario.key, "Test2");
        assert_eq!(scenario.variables["env"].raw, r#""prod""#);
        assert_eq!(scenario.variables["endpoint"].raw, "'http://toto.com'");
        assert_eq!(
            scenario
                .block_step()
                .unwrap()
                .kind,
            StepKind::Reload
        );
    }

    #[test]
    fn warmup_keeps_raw_literals() {
        let set = parse(trim(
            r#"
scenario Test 1
    visit url('/blog/')
        warmup true

scenario Test 2
    visit url('/blog/')
        warmup false

scenario Test 3
    visit url('/blog/')
        warmup 'auto'
            "#,
        ));

        assert_eq!(set.len(), 3);

        let warmup = |i: usize| {
            set.scenarios[i]
                .block_step()
                .unwrap()
                .warmup
                .clone()
        };
        assert_eq!(warmup(0), Some("true".to_string()));
        assert_eq!(warmup(1), Some("false".to_string()));
        assert_eq!(warmup(2), Some("'auto'".to_string()));
    }

    #[test]
    fn block_step_is_the_first_step() {
        let set = parse(trim(
            r#"
scenario
    visit url('/')
        expect status_code() == 200

    click link('Read more')
        expect status_code() == 200
            "#,
        ));

        let scenario = &set.scenarios[0];
        assert_eq!(
            scenario
                .steps
                .len(),
            2
        );
        assert!(matches!(
            scenario
                .block_step()
                .unwrap()
                .kind,
            StepKind::Visit { .. }
        ));
        match &scenario.steps[1].kind {
            StepKind::Click { link } => assert_eq!(link.raw, "link('Read more')"),
            other => panic!("expected a click, got {:?}", other),
        }
    }

    #[test]
    fn anonymous_scenarios_are_distinct() {
        let set = parse(trim(
            r#"
scenario
    name "Scenario Name"
    endpoint "http://example.com/"

    visit url('/')
        expect status_code() == 200
            "#,
        ));

        let scenario = &set.scenarios[0];
        assert_eq!(scenario.key, "scenario 1");
        assert_eq!(
            scenario
                .config
                .name
                .as_ref()
                .unwrap()
                .raw,
            r#""Scenario Name""#
        );
        assert_eq!(scenario.variables["endpoint"].raw, r#""http://example.com/""#);
    }

    #[test]
    fn submit_with_params_and_file_upload() {
        let set = parse(trim(
            r#"
scenario
    submit button("Submit")
        param title 'Happy Scraping'
        param content 'Scraping is so easy!'

        # File Upload:
        # the path is relative to the current scenario file
        # the name parameter is optional
        param image file('relative/path/to/image.png', 'pacer.png')
            "#,
        ));

        let step = set.scenarios[0]
            .block_step()
            .unwrap();
        match &step.kind {
            StepKind::Submit { button } => assert_eq!(button.raw, r#"button("Submit")"#),
            other => panic!("expected a submit, got {:?}", other),
        }

        assert_eq!(
            step.params
                .len(),
            3
        );
        assert_eq!(step.params[0].name, "title");
        assert_eq!(step.params[0].value.raw, "'Happy Scraping'");
        assert_eq!(step.params[2].name, "image");
        match &step.params[2].value.kind {
            ExpressionKind::Call { name, args } => {
                assert_eq!(name, "file");
                assert_eq!(args.len(), 2);
                assert_eq!(args[0].raw, "'relative/path/to/image.png'");
                assert_eq!(args[1].raw, "'pacer.png'");
            }
            other => panic!("expected a call, got {:?}", other),
        }
    }

    #[test]
    fn extraction_bindings_accumulate_in_order() {
        let set = parse(trim(
            r#"
scenario
    visit url('/')
        expect status_code() == 200
        set latest_post_title css(".post h2").first()
        set latest_post_href css(".post h2 a").first().attr("href")
        set latest_posts css(".post h2 a").extract('_text', 'href')
        set age header("Age")
        set token regex('/name="_token" value="([^"]+)"/')
            "#,
        ));

        let step = set.scenarios[0]
            .block_step()
            .unwrap();
        let names: Vec<&str> = step
            .sets
            .iter()
            .map(|binding| binding.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "latest_post_title",
                "latest_post_href",
                "latest_posts",
                "age",
                "token"
            ]
        );

        assert!(matches!(
            step.sets[0].value.kind,
            ExpressionKind::Chain { .. }
        ));
        assert_eq!(
            step.sets[1].value.raw,
            r#"css(".post h2 a").first().attr("href")"#
        );
        assert!(matches!(
            step.sets[3].value.kind,
            ExpressionKind::Call { .. }
        ));
    }

    #[test]
    fn scenario_level_auth_and_headers() {
        let set = parse(trim(
            r#"
set api_username "user"
set api_password "password"

scenario
    name "Scenario name"
    auth api_username ~ ':' ~ api_password
    header "Accept-Language: en-US"

    visit url('/profiles')
        expect status_code() == 200
            "#,
        ));

        let scenario = &set.scenarios[0];
        let auth = scenario
            .config
            .auth
            .as_ref()
            .unwrap();
        assert_eq!(auth.raw, "api_username ~ ':' ~ api_password");
        assert!(matches!(auth.kind, ExpressionKind::Concat(_, _)));

        assert_eq!(
            scenario
                .config
                .headers
                .len(),
            1
        );
    }

    #[test]
    fn follow_after_redirect() {
        let set = parse(trim(
            r#"
scenario
    visit "redirect.php"
        expect status_code() == 302
        expect header('Location') == '/redirected.php'

    follow
        expect status_code() == 200
            "#,
        ));

        let scenario = &set.scenarios[0];
        assert_eq!(
            scenario
                .steps
                .len(),
            2
        );

        // a visit target does not have to be a url() call
        match &scenario.steps[0].kind {
            StepKind::Visit { url } => assert_eq!(url.raw, r#""redirect.php""#),
            other => panic!("expected a visit, got {:?}", other),
        }
        assert_eq!(
            scenario.steps[0]
                .expects
                .len(),
            2
        );

        assert_eq!(scenario.steps[1].kind, StepKind::Follow);
        assert_eq!(
            scenario.steps[1]
                .expects
                .len(),
            1
        );
    }

    #[test]
    fn step_settings_round_out() {
        let set = parse(trim(
            r#"
scenario
    visit url('/')
        method 'POST'
        body '{ "title": "New Title" }'
        param foo "bar"
        json true
        wait fake('numberBetween', 1000, 3000)
        auth "username:password"
            "#,
        ));

        let step = set.scenarios[0]
            .block_step()
            .unwrap();
        assert_eq!(
            step.method
                .as_ref()
                .unwrap()
                .raw,
            "'POST'"
        );
        assert_eq!(
            step.body
                .as_ref()
                .unwrap()
                .raw,
            r#"'{ "title": "New Title" }'"#
        );
        assert_eq!(step.json, Some(true));
        assert!(matches!(
            step.wait
                .as_ref()
                .unwrap()
                .kind,
            ExpressionKind::Call { .. }
        ));
        assert_eq!(
            step.auth
                .as_ref()
                .unwrap()
                .raw,
            r#""username:password""#
        );
    }

    #[test]
    fn headers_accumulate_in_order() {
        let set = parse(trim(
            r#"
scenario
    visit url('/')
        header "Accept-Language: en-US"
        header 'User-Agent: ' ~ fake('firefox')
        header "X-Requested-With: XMLHttpRequest"
            "#,
        ));

        let step = set.scenarios[0]
            .block_step()
            .unwrap();
        let headers: Vec<&str> = step
            .headers
            .iter()
            .map(|header| header.raw())
            .collect();
        assert_eq!(
            headers,
            vec![
                r#""Accept-Language: en-US""#,
                "'User-Agent: ' ~ fake('firefox')",
                r#""X-Requested-With: XMLHttpRequest""#,
            ]
        );
    }

    #[test]
    fn documentation_samples_parse() {
        let samples = [
            r#"
scenario
    visit url('/')
        expect status_code() == 200

    visit url('/blog/')
        expect status_code() == 200
            "#,
            r#"
# This is a comment
scenario
    # Comments are ignored
    visit url('/')
        expect status_code() == 200
            "#,
            r#"
scenario
    click link("Add a blog post")
            "#,
            r#"
scenario
    submit button("Submit")
        param title fake('sentence', 5)
        param content join(fake('paragraphs', 3), "\n\n")
            "#,
            r#"
scenario
    follow_redirects true
            "#,
            r#"
scenario
    visit "redirect.php"
        follow_redirects
            "#,
            r#"
scenario
    visit url('/')
        header 'User-Agent: ' ~ fake('firefox')
            "#,
            r#"
scenario
    visit url('/')
        wait 10000
            "#,
            r#"
scenario
    visit url('/')
        header "Accept-Language: false"
        auth false
            "#,
            r#"
scenario
    name "Scenario Name"
    # Use the environment name (or UUID) you're targeting or false to disable
    blackfire "Environment name"
            "#,
            r#"
scenario
    name "Scenario Name"
    blackfire true
            "#,
            r#"
set api_username "user"
set api_password "password"

scenario
    name "Scenario name"
    auth api_username ~ ':' ~ api_password
    set profile_uuid 'zzzz'

    visit url('/profiles' ~ profile_uuid)
        expect status_code() == 200
        set sql_queries json('arguments."sql.pdo.queries".keys(@)')
        set store_url json("_links.store.href")

    visit url(store_url)
        method 'POST'
        body '{ "foo": "batman" }'
        expect status_code() == 200
            "#,
        ];

        for sample in samples {
            let set = parse(trim(sample));
            assert!(!set.is_empty());
        }
    }
}
