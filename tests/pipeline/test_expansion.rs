use raptor_taskgen::core::config::{Parameters, TransformConfig};
use raptor_taskgen::core::transform::{self, JobTransform, SplitAppsTransform};
use raptor_taskgen::core::types::ErrorCategory;
use raptor_taskgen::core::{parse_kind, JobRecord};
use serde_json::{json, Value};

fn job(value: Value) -> JobRecord {
    JobRecord::from_value(value).expect("job mapping")
}

fn expand(config: &TransformConfig, jobs: Vec<Value>) -> Vec<JobRecord> {
    transform::apply_default_pipeline(config, jobs.into_iter().map(job).collect())
        .expect("pipeline")
}

fn names(jobs: &[JobRecord]) -> Vec<&str> {
    jobs.iter().map(JobRecord::test_name).collect()
}

#[test]
fn browsertime_chrome_cold_end_to_end() {
    let jobs = expand(
        &TransformConfig::default(),
        vec![json!({
            "test-name": "browsertime-tp6-foo",
            "test-platform": "linux64-shippable/opt",
            "raptor-test": "foo",
            "apps": ["chrome"],
            "pageload": "cold",
            "require-signed-extensions": false,
            "treeherder-symbol": "tp6(foo)",
            "description": "Browsertime tp6 foo"
        })],
    );

    assert_eq!(jobs.len(), 1);
    let out = &jobs[0];
    assert_eq!(out.test_name(), "browsertime-tp6-foo-chrome-cold");
    assert_eq!(out.str_field("try-name"), Some("browsertime-tp6-foo-chrome-cold"));
    assert_eq!(out.str_field("treeherder-symbol"), Some("tp6-ChR(foo-c)"));
    assert_eq!(
        out.str_field("description"),
        Some("Browsertime tp6 foo on Chrome using cold pageload")
    );
    assert_eq!(out.get("max-run-time"), Some(&json!(3000)));
    assert_eq!(out.extra_options(), vec!["--app=chrome", "--cold", "--test=foo"]);

    let keys: Vec<&str> = out.as_map().keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec![
            "test-name",
            "test-platform",
            "require-signed-extensions",
            "treeherder-symbol",
            "description",
            "try-name",
            "max-run-time",
            "mozharness"
        ]
    );
}

#[test]
fn consumed_fields_never_reach_the_output() {
    let yaml = r#"
job-defaults:
    require-signed-extensions: false
    test-platform: android-hw-g5-7-0-arm7-api-16/opt
    apps: ["fenix", "geckoview", "refbrow"]
    condprof: true
    pageload:
        by-app:
            fenix: both
            default: warm
    activity:
        by-app:
            fenix: org.mozilla.fenix.IntentReceiverActivity
            default: org.mozilla.gecko.BrowserApp
    binary-path:
        by-app:
            refbrow: org.mozilla.reference.browser.raptor
            default: org.mozilla.geckoview_example
    run-visual-metrics:
        by-app:
            fenix: true
            default: false
jobs:
    raptor-tp6m-1:
        description: Raptor tp6m-1
        treeherder-symbol: Rap(tp6m-1)
        raptor-test: raptor-tp6m-1
    raptor-tp6m-essential:
        description: Raptor tp6m essential
        treeherder-symbol: Rap(tp6m-e)
        raptor-test: raptor-tp6m-essential
        raptor-subtests: ["amazon", "google"]
"#;
    let jobs = transform::apply_default_pipeline(
        &TransformConfig::default(),
        parse_kind(yaml, "inline").expect("kind"),
    )
    .expect("pipeline");

    let consumed = [
        "apps",
        "app",
        "pageload",
        "condprof",
        "activity",
        "binary-path",
        "raptor-test",
        "raptor-subtests",
        "cold",
        "run-visual-metrics",
    ];
    for out in &jobs {
        for field in consumed {
            assert!(!out.contains(field), "{} kept {}", out.test_name(), field);
        }
        assert!(out.contains("require-signed-extensions"));
    }

    // tp6m-1: fenix warm + condprof, fenix cold + condprof, geckoview + condprof, refbrow + condprof
    assert_eq!(
        names(&jobs[..8]),
        vec![
            "raptor-tp6m-1-fenix",
            "raptor-tp6m-1-fenix-condprof",
            "raptor-tp6m-1-fenix-cold",
            "raptor-tp6m-1-fenix-cold-condprof",
            "raptor-tp6m-1-geckoview",
            "raptor-tp6m-1-geckoview-condprof",
            "raptor-tp6m-1-refbrow",
            "raptor-tp6m-1-refbrow-condprof",
        ]
    );
    assert_eq!(jobs.len(), 8 + 16);

    let fenix = &jobs[0];
    assert_eq!(fenix.str_field("treeherder-symbol"), Some("Rap-fenix(tp6m-1)"));
    assert_eq!(
        fenix.extra_options(),
        vec![
            "--browsertime-video",
            "--app=fenix",
            "--activity=org.mozilla.fenix.IntentReceiverActivity",
            "--binary-path=org.mozilla.geckoview_example",
            "--test=raptor-tp6m-1",
        ]
    );
    assert_eq!(fenix.get("attributes"), Some(&json!({"run-visual-metrics": true})));

    let fenix_cold_condprof = &jobs[3];
    assert_eq!(
        fenix_cold_condprof.str_field("treeherder-symbol"),
        Some("Rap-fenix(tp6m-1-c-condprof)")
    );
    assert_eq!(
        fenix_cold_condprof.extra_options(),
        vec![
            "--with-conditioned-profile",
            "--browsertime-video",
            "--app=fenix",
            "--activity=org.mozilla.fenix.IntentReceiverActivity",
            "--binary-path=org.mozilla.geckoview_example",
            "--test=raptor-tp6m-1-cold",
        ]
    );

    let subtests = &jobs[8..];
    assert_eq!(subtests[0].test_name(), "raptor-tp6m-essential-fenix-amazon");
    assert_eq!(subtests[1].test_name(), "raptor-tp6m-essential-fenix-google");
    assert_eq!(
        subtests[0].str_field("treeherder-symbol"),
        Some("Rap-fenix(tp6m-e-1)")
    );
    assert_eq!(
        subtests[1].str_field("treeherder-symbol"),
        Some("Rap-fenix(tp6m-e-2)")
    );
    assert!(subtests[0].extra_options().contains(&"--test=amazon"));
    assert!(!names(subtests).contains(&"raptor-tp6m-essential-fenix"));
}

#[test]
fn split_apps_is_identity_without_apps() {
    let input = job(json!({
        "test-name": "raptor-speedometer",
        "try-name": "raptor-speedometer",
        "test-platform": "macosx1014-64-shippable/opt",
        "require-signed-extensions": true,
        "treeherder-symbol": "Rap(sp)",
        "description": "Raptor speedometer",
        "variants": ["fission"]
    }));
    let out = SplitAppsTransform
        .transform(&TransformConfig::default(), vec![input.clone()])
        .expect("split");
    assert_eq!(out, vec![input]);
}

#[test]
fn chrome_jobs_never_get_condprof_twins() {
    let jobs = expand(
        &TransformConfig::default(),
        vec![json!({
            "test-name": "raptor-speedometer",
            "test-platform": "linux64-shippable/opt",
            "require-signed-extensions": false,
            "treeherder-symbol": "Rap(sp)",
            "description": "Raptor speedometer",
            "apps": ["firefox", "chrome", "chromium"],
            "condprof": true
        })],
    );
    assert_eq!(
        names(&jobs),
        vec![
            "raptor-speedometer-firefox",
            "raptor-speedometer-firefox-condprof",
            "raptor-speedometer-chrome",
            "raptor-speedometer-chromium",
        ]
    );
}

#[test]
fn signed_extensions_only_yields_release_build_flag() {
    let jobs = expand(
        &TransformConfig::default(),
        vec![json!({
            "test-name": "raptor-tp6-1",
            "test-platform": "windows10-64-shippable/opt",
            "require-signed-extensions": true,
            "treeherder-symbol": "Rap(tp6-1)",
            "description": "Raptor tp6-1"
        })],
    );
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].extra_options(), vec!["--is-release-build"]);
}

#[test]
fn youtube_playback_url_params_on_try() {
    let config = TransformConfig::new("raptor", Parameters::for_project("try"));
    let jobs = expand(
        &config,
        vec![json!({
            "test-name": "raptor-youtube-playback",
            "test-platform": "android-hw-g5-7-0-arm7-api-16/opt",
            "require-signed-extensions": false,
            "treeherder-symbol": "Rap(ytp)",
            "description": "Raptor youtube playback",
            "apps": ["geckoview"]
        })],
    );
    let options = jobs[0].extra_options();
    assert_eq!(options[0], "--app=geckoview");
    assert!(options[1].starts_with("--test-url-params=exclude="));
    assert!(options[1].ends_with(",95,96"));
}

#[test]
fn single_default_alternative_resolves_without_app() {
    let value = json!({
        "test-name": "raptor-tp6-1",
        "test-platform": "linux64-shippable/opt",
        "require-signed-extensions": false,
        "treeherder-symbol": "Rap(tp6-1)",
        "description": "Raptor tp6-1",
        "max-run-time": {"by-app": {"default": 1200}},
        "run-on-projects": ["mozilla-central"]
    });
    let jobs = expand(&TransformConfig::default(), vec![value]);
    assert_eq!(jobs[0].get("max-run-time"), Some(&json!(1200)));
    assert_eq!(jobs[0].get("run-on-projects"), Some(&json!(["mozilla-central"])));
}

#[test]
fn schema_violation_aborts_before_any_output() {
    let err = transform::apply_default_pipeline(
        &TransformConfig::default(),
        vec![
            job(json!({
                "test-name": "raptor-tp6-1",
                "test-platform": "linux64/opt",
                "require-signed-extensions": false,
                "treeherder-symbol": "Rap(tp6-1)",
                "description": "Raptor tp6-1"
            })),
            job(json!({
                "test-name": "raptor-tp6-2",
                "test-platform": "linux64/opt",
                "treeherder-symbol": "Rap(tp6-2)",
                "description": "Raptor tp6-2"
            })),
        ],
    )
    .expect_err("missing require-signed-extensions");
    assert_eq!(err.category, ErrorCategory::ValidationError);
    assert_eq!(err.code, "RAPTOR-SCHEMA-001");
    assert_eq!(
        err.context.get("stage").map(String::as_str),
        Some("ValidateSchemaTransform")
    );
}

#[test]
fn job_without_description_is_rejected() {
    let err = transform::apply_default_pipeline(
        &TransformConfig::default(),
        vec![job(json!({
            "test-name": "browsertime-tp6-foo",
            "test-platform": "linux64-shippable/opt",
            "raptor-test": "foo",
            "apps": ["chrome"],
            "pageload": "cold",
            "require-signed-extensions": false,
            "treeherder-symbol": "tp6(foo)"
        }))],
    )
    .expect_err("description is required");
    assert_eq!(err.code, "RAPTOR-SCHEMA-001");
    assert_eq!(err.context.get("field").map(String::as_str), Some("description"));
    assert_eq!(
        err.context.get("test-name").map(String::as_str),
        Some("browsertime-tp6-foo")
    );
}

#[test]
fn cold_without_raptor_test_is_an_invariant_violation() {
    let err = transform::apply_default_pipeline(
        &TransformConfig::default(),
        vec![job(json!({
            "test-name": "raptor-tp6-1",
            "test-platform": "linux64/opt",
            "require-signed-extensions": false,
            "treeherder-symbol": "Rap(tp6-1)",
            "description": "Raptor tp6-1",
            "pageload": "both"
        }))],
    )
    .expect_err("cold needs raptor-test");
    assert_eq!(err.category, ErrorCategory::InvariantViolation);
    assert_eq!(err.code, "RAPTOR-INVARIANT-001");
    assert_eq!(
        err.context.get("stage").map(String::as_str),
        Some("SplitPageloadTransform")
    );
}

#[test]
fn unresolvable_keyed_by_names_field_and_job() {
    let err = transform::apply_default_pipeline(
        &TransformConfig::default(),
        vec![job(json!({
            "test-name": "raptor-tp6-1",
            "test-platform": "linux64/opt",
            "require-signed-extensions": false,
            "treeherder-symbol": "Rap(tp6-1)",
            "description": "Raptor tp6-1",
            "apps": ["chrome"],
            "activity": {"by-app": {"fenix": "org.mozilla.fenix.IntentReceiverActivity"}}
        }))],
    )
    .expect_err("no alternative for chrome");
    assert_eq!(err.category, ErrorCategory::ResolutionError);
    assert_eq!(err.code, "RAPTOR-KEYED-001");
    assert_eq!(err.context.get("field").map(String::as_str), Some("activity"));
    assert_eq!(
        err.context.get("test-name").map(String::as_str),
        Some("raptor-tp6-1-chrome")
    );
}

#[test]
fn stage_order_is_fixed() {
    insta::assert_debug_snapshot!(transform::stage_names(), @r###"
    [
        "ValidateSchemaTransform",
        "SetDefaultsTransform",
        "SplitAppsTransform",
        "ResolveKeyedByTransform",
        "SplitPageloadTransform",
        "ConditionedProfileTransform",
        "SplitSubtestsTransform",
        "ExtraOptionsTransform",
    ]
    "###);
}
