use caddyfile_analysis::schema::{self, BodySchema};
use caddyfile_analysis::{
    CompletionContext, Diagnostic, Position, Severity, analyze, collect_snippet_names,
    resolve_completion_context,
};
use caddyfile_parse::parse;

fn analyze_source(source: &str) -> Vec<Diagnostic> {
    let (file, errors) = parse(source);
    assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
    analyze(&file)
}

#[test]
fn known_directive_is_clean() {
    let diagnostics = analyze_source("example.com {\n\treverse_proxy localhost\n}\n");
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
}

#[test]
fn unknown_directive_warns_at_name() {
    let diagnostics = analyze_source("example.com {\n\tfoobar\n}\n");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Warning);
    assert!(diagnostics[0].message.contains("\"foobar\""));
    assert_eq!(diagnostics[0].range.start, Position::new(1, 1));
}

#[test]
fn misplaced_subdirective_names_its_parent() {
    let diagnostics = analyze_source("example.com {\n\tto localhost:8080\n}\n");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Warning);
    assert!(diagnostics[0].message.contains("\"to\""));
    assert!(diagnostics[0].message.contains("\"reverse_proxy\""));
}

#[test]
fn snippet_import_resolves() {
    let defined = "(s) {\n\trespond \"ok\"\n}\nexample.com {\n\timport s\n}\n";
    let diagnostics = analyze_source(defined);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");

    let undefined = "(s) {\n\trespond \"ok\"\n}\nexample.com {\n\timport t\n}\n";
    let diagnostics = analyze_source(undefined);
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].message.contains("\"t\""));
    assert_eq!(diagnostics[0].range.start, Position::new(4, 8));
}

#[test]
fn environment_placeholders_are_clean() {
    let sources = [
        "example.com {\n\treverse_proxy /admin-api/* https://{$LOCALHOST_GATEWAY}:3355 {\n\t\theader_up X-Real-IP {http.request.remote.host}\n\t}\n}\n",
        "{$SITE_ADDR} {\n\treverse_proxy /api/* {$BACKEND}\n}\n",
        "https://{$DOMAIN}:8080 {\n\troot * /var/www/{env.APP_DIR}/public\n\tfile_server\n}\n",
    ];
    for source in sources {
        let diagnostics = analyze_source(source);
        assert!(diagnostics.is_empty(), "{source}: {diagnostics:?}");
    }
}

#[test]
fn unbalanced_placeholders_are_errors() {
    let sources = [
        "example.com {\n\treverse_proxy {$UPSTREAM\n}\n",
        "example.com {\n\treverse_proxy $UPSTREAM}\n}\n",
        "{$SITE_ADDR {\n\trespond ok\n}\n",
        "example.com {\n\treverse_proxy localhost {\n\t\theader_up X {http.request.host\n\t}\n}\n",
    ];
    for source in sources {
        let diagnostics = analyze_source(source);
        assert_eq!(diagnostics.len(), 1, "{source}: {diagnostics:?}");
        assert_eq!(diagnostics[0].severity, Severity::Error, "{source}");
    }
}

#[test]
fn completion_inside_reverse_proxy() {
    let source = "example.com {\n\treverse_proxy {\n\t\t\n\t}\n}\n";
    let (file, _) = parse(source);
    match resolve_completion_context(&file, source, Position::new(2, 2)) {
        CompletionContext::SubdirectiveNames { parent, names } => {
            assert_eq!(parent, "reverse_proxy");
            assert!(names.contains(&"to"));
            assert!(names.contains(&"transport"));
            assert!(names.contains(&"lb_policy"));
            assert!(!names.contains(&"tls"));
        }
        other => panic!("unexpected context {other:?}"),
    }
}

#[test]
fn snippet_names_feed_completion() {
    let source = "(beta) {\n}\n(alpha) {\n}\nexample.com {\n\timport a\n}\n";
    let (file, _) = parse(source);
    assert_eq!(collect_snippet_names(&file), vec!["alpha", "beta"]);
    assert_eq!(
        resolve_completion_context(&file, source, Position::new(5, 9)),
        CompletionContext::SnippetNamePrefix("a".to_string())
    );
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Every directive with a name list, paired with its names.
    fn modeled_parents() -> Vec<(&'static str, &'static [&'static str])> {
        schema::TOP_LEVEL
            .iter()
            .filter_map(|parent| match schema::subdirectives_for(parent) {
                BodySchema::Names(names) => Some((*parent, names)),
                _ => None,
            })
            .collect()
    }

    fn known_child() -> impl Strategy<Value = (&'static str, &'static str)> {
        prop::sample::select(
            modeled_parents()
                .into_iter()
                .flat_map(|(parent, names)| names.iter().map(move |name| (parent, *name)))
                .collect::<Vec<_>>(),
        )
    }

    fn unknown_child() -> impl Strategy<Value = ((&'static str, &'static [&'static str]), String)> {
        (
            prop::sample::select(modeled_parents()),
            prop::string::string_regex("[a-z][a-z_]{0,12}").unwrap(),
        )
    }

    proptest! {
        #[test]
        fn known_subdirectives_are_clean((parent, name) in known_child()) {
            let source = format!("example.com {{\n\t{parent} {{\n\t\t{name} value\n\t}}\n}}\n");
            let diagnostics = analyze_source(&source);
            prop_assert!(diagnostics.is_empty(), "{:?}", diagnostics);
        }

        #[test]
        fn unknown_subdirectives_warn_once(((parent, names), name) in unknown_child()) {
            prop_assume!(names.binary_search(&name.as_str()).is_err());
            prop_assume!(name != "import");
            let source = format!("example.com {{\n\t{parent} {{\n\t\t{name} value\n\t}}\n}}\n");
            let diagnostics = analyze_source(&source);
            prop_assert_eq!(diagnostics.len(), 1);
            prop_assert_eq!(diagnostics[0].severity, Severity::Warning);
            let parent_quoted = format!("{parent:?}");
            let name_quoted = format!("{name:?}");
            prop_assert!(diagnostics[0].message.contains(&name_quoted));
            prop_assert!(diagnostics[0].message.contains(&parent_quoted));
            prop_assert_eq!(diagnostics[0].range.start, Position::new(2, 2));
        }
    }
}
