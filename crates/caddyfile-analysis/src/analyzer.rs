//! Schema validation of a parsed file.

use caddyfile_parse::{Directive, File, Token};
use tracing::debug;

use crate::schema::{self, BodySchema};
use crate::{Diagnostic, check_placeholder_balance, collect_snippet_names};

/// Validate `file` against the schema tables.
///
/// Unknown or misplaced names are warnings; unbalanced placeholder braces are
/// errors. The result is deterministic for a given file, but no particular
/// order is promised.
pub fn analyze(file: &File<'_>) -> Vec<Diagnostic> {
    let mut analyzer = Analyzer {
        snippets: collect_snippet_names(file),
        diagnostics: Vec::new(),
    };

    if let Some(global) = &file.global {
        for directive in &global.directives {
            analyzer.global_directive(directive);
        }
    }

    for site in &file.sites {
        let in_snippet = site.is_snippet();
        for directive in &site.directives {
            analyzer.site_directive(directive, in_snippet);
        }
    }

    analyzer.placeholders(file);

    debug!(
        diagnostics = analyzer.diagnostics.len(),
        snippets = analyzer.snippets.len(),
        "analyzed file"
    );
    analyzer.diagnostics
}

struct Analyzer<'src> {
    /// Sorted snippet names declared in the file.
    snippets: Vec<&'src str>,
    diagnostics: Vec<Diagnostic>,
}

impl<'src> Analyzer<'src> {
    fn warn(&mut self, token: &Token<'_>, message: String) {
        self.diagnostics.push(Diagnostic::warning(token.range(), message));
    }

    fn global_directive(&mut self, directive: &Directive<'_>) {
        let name = directive.name();
        if name.starts_with('@') {
            return;
        }
        if !schema::is_global_option(name) {
            self.warn(&directive.name, format!("unknown global option {name:?}"));
            return;
        }
        if name == "import" {
            self.import(directive);
        }
    }

    /// Validate a directive in a site-level list: a site block, a snippet, or
    /// the body of a container.
    fn site_directive(&mut self, directive: &Directive<'_>, in_snippet: bool) {
        let name = directive.name();
        if name.starts_with('@') {
            return;
        }

        if !schema::is_top_level(name) {
            let hint = schema::placement_hint_for(name);
            // A snippet can be imported inside the hinted parent.
            if in_snippet && hint.is_some() {
                return;
            }
            let message = match hint {
                Some(parent) => format!(
                    "{name:?} must appear inside a {parent:?} block, not at the site level"
                ),
                None => format!("unknown directive {name:?}"),
            };
            self.warn(&directive.name, message);
            return;
        }

        if name == "import" {
            self.import(directive);
            return;
        }

        if directive.body.is_empty() {
            return;
        }

        if schema::is_container(name) {
            for child in &directive.body {
                self.site_directive(child, in_snippet);
            }
            return;
        }

        if let BodySchema::Names(names) = schema::subdirectives_for(name) {
            self.body(name, names, &directive.body);
        }
    }

    /// Validate the children of `parent` against its subdirective names.
    fn body(&mut self, parent: &str, names: &[&str], body: &[Directive<'_>]) {
        for sub in body {
            let sub_name = sub.name();
            if sub_name.starts_with('@') {
                continue;
            }
            if sub_name == "import" {
                self.import(sub);
                continue;
            }
            if names.binary_search(&sub_name).is_err() {
                let message = match schema::placement_hint_for(sub_name) {
                    Some(hinted) => format!(
                        "{sub_name:?} is not valid inside {parent:?}; it must appear inside a {hinted:?} block"
                    ),
                    None => format!("unknown subdirective {sub_name:?} for {parent:?}"),
                };
                self.warn(&sub.name, message);
                continue;
            }
            if sub.body.is_empty() {
                continue;
            }
            let Some(arg) = sub.first_arg() else {
                continue;
            };
            if let Some(nested) = schema::sub_subdirectives_for(sub_name, arg) {
                self.nested_body(parent, sub, nested);
            }
        }
    }

    /// Validate one level deeper, e.g. the body of `transport http`.
    fn nested_body(&mut self, grandparent: &str, sub: &Directive<'_>, names: &[&str]) {
        let qualified = match sub.first_arg() {
            Some(arg) => format!("{} {arg}", sub.name()),
            None => sub.name().to_string(),
        };
        for child in &sub.body {
            let child_name = child.name();
            if child_name.starts_with('@') {
                continue;
            }
            if child_name == "import" {
                self.import(child);
                continue;
            }
            if names.binary_search(&child_name).is_err() {
                self.warn(
                    &child.name,
                    format!("unknown subdirective {child_name:?} for {grandparent:?} {qualified:?}"),
                );
            }
        }
    }

    /// Check that `import <name>` refers to a snippet declared in the file.
    fn import(&mut self, directive: &Directive<'_>) {
        let Some(arg) = directive.args.first() else {
            return;
        };
        let target = arg.value();
        if is_file_import(target) || is_placeholder(target) {
            return;
        }
        if self.snippets.binary_search(&target).is_err() {
            self.warn(arg, format!("undefined snippet {target:?}"));
        }
    }

    /// Report unbalanced placeholder braces in every address and argument.
    fn placeholders(&mut self, file: &File<'_>) {
        if let Some(global) = &file.global {
            self.directive_placeholders(&global.directives);
        }
        for site in &file.sites {
            for address in &site.addresses {
                self.token_placeholders(address);
            }
            self.directive_placeholders(&site.directives);
        }
    }

    fn directive_placeholders(&mut self, directives: &[Directive<'_>]) {
        for directive in directives {
            for arg in &directive.args {
                self.token_placeholders(arg);
            }
            self.directive_placeholders(&directive.body);
        }
    }

    fn token_placeholders(&mut self, token: &Token<'_>) {
        if let Some(message) = check_placeholder_balance(token.text).message() {
            self.diagnostics.push(Diagnostic::error(token.range(), message));
        }
    }
}

/// File paths and globs are imported from disk, not from snippets.
fn is_file_import(target: &str) -> bool {
    target.contains(['/', '\\', '*']) || target.starts_with('.')
}

/// Runtime placeholders such as `{$SNIPPET}` cannot be resolved statically.
fn is_placeholder(target: &str) -> bool {
    target.starts_with('{') && target.ends_with('}')
}

#[cfg(test)]
mod tests {
    use super::*;
    use caddyfile_parse::parse;
    use caddyfile_testhelpers::{ActualError, assert_annotated_errors, source_without_annotations};

    fn diagnostics(source: &str) -> Vec<Diagnostic> {
        let (file, errors) = parse(source);
        assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
        analyze(&file)
    }

    fn assert_diagnostics(annotated_source: &str) {
        let source = source_without_annotations(annotated_source);
        let actual = diagnostics(&source)
            .into_iter()
            .map(|d| ActualError::new(d.range, d.message))
            .collect();
        assert_annotated_errors(annotated_source, actual);
    }

    #[test]
    fn test_global_options() {
        assert_diagnostics(
            r#"
{
    debug
    email admin@example.com
    @matcher path /x
    frobnicate on
    ^^^^^^^^^^ unknown global option "frobnicate"
    respond ok
    ^^^^^^^ unknown global option "respond"
}
"#,
        );
    }

    #[test]
    fn test_matchers_are_always_valid() {
        assert!(diagnostics("example.com {\n\t@api path /api/*\n\treverse_proxy @api localhost {\n\t\t@x header Foo\n\t}\n}\n").is_empty());
    }

    #[test]
    fn test_unknown_directive_body_is_not_checked() {
        assert_diagnostics(
            r#"
example.com {
    frobnicate {
    ^^^^^^^^^^ unknown directive "frobnicate"
        alsobogus
    }
}
"#,
        );
    }

    #[test]
    fn test_container_recursion() {
        assert_diagnostics(
            r#"
example.com {
    handle /api/* {
        route {
            reverse_proxy localhost {
                lb_polcy first
                ^^^^^^^^ unknown subdirective "lb_polcy" for "reverse_proxy"
            }
            nonsense
            ^^^^^^^^ unknown directive "nonsense"
        }
        to backend
        ^^ "to" must appear inside a "reverse_proxy" block
    }
}
"#,
        );
    }

    #[test]
    fn test_placement_hint_wins_inside_other_body() {
        assert_diagnostics(
            r#"
example.com {
    tls {
        to localhost
        ^^ "to" is not valid inside "tls"; it must appear inside a "reverse_proxy" block
        protocols tls1.2 tls1.3
    }
}
"#,
        );
    }

    #[test]
    fn test_freeform_and_unmodeled_bodies() {
        assert!(diagnostics("example.com {\n\theader {\n\t\tX-Anything yes\n\t}\n\trespond {\n\t\twhatever\n\t}\n}\n").is_empty());
    }

    #[test]
    fn test_sub_subdirectives() {
        assert_diagnostics(
            r#"
example.com {
    reverse_proxy localhost {
        transport http {
            read_timeout 5s
            keepalive 30s
            split .php
            ^^^^^ unknown subdirective "split" for "reverse_proxy" "transport http"
        }
        transport fastcgi {
            split .php
            bogus
            ^^^^^ unknown subdirective "bogus" for "reverse_proxy" "transport fastcgi"
        }
        transport h2c {
            anything goes
        }
    }
}
"#,
        );
    }

    #[test]
    fn test_imports() {
        assert_diagnostics(
            r#"
(common) {
    encode gzip
}
example.com {
    import common
    import missing
           ^^^^^^^ undefined snippet "missing"
    import ./sites/*.caddy
    import sites/extra
    import {$SNIPPET}
    import
    reverse_proxy localhost {
        import nested_missing
               ^^^^^^^^^^^^^^ undefined snippet "nested_missing"
    }
}
"#,
        );
    }

    #[test]
    fn test_global_import() {
        assert_diagnostics(
            r#"
{
    import globals
           ^^^^^^^ undefined snippet "globals"
}
"#,
        );
    }

    #[test]
    fn test_snippet_bodies() {
        assert_diagnostics(
            r#"
(proxy_bits) {
    transport http
    lb_policy first
    header_up Host {host}
    bogus
    ^^^^^ unknown directive "bogus"
}
"#,
        );
    }

    #[test]
    fn test_placeholder_balance() {
        assert_diagnostics(
            r#"
{$SITE_ADDR {
^^^^^^^^^^^ unclosed placeholder
    reverse_proxy {$UPSTREAM
                  ^^^^^^^^^^ unclosed placeholder
    reverse_proxy $UPSTREAM}
                  ^^^^^^^^^^ unmatched '}'
    reverse_proxy /admin-api/* https://{$LOCALHOST_GATEWAY}:3355 {
        header_up X-Real-IP {http.request.remote.host}
        header_up X-Host {http.request.host
                         ^^^^^^^^^^^^^^^^^^ unclosed placeholder
    }
    respond \{literal\}
}
"#,
        );
    }

    #[test]
    fn test_placeholder_diagnostics_are_errors() {
        let found = diagnostics("example.com {\n\treverse_proxy {$UPSTREAM\n}\n");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].severity, crate::Severity::Error);
    }

    #[test]
    fn test_file_import_detection() {
        assert!(is_file_import("./common.caddy"));
        assert!(is_file_import("sites/*"));
        assert!(is_file_import(r"C:\caddy\common"));
        assert!(is_file_import(".hidden"));
        assert!(!is_file_import("common"));
        assert!(is_placeholder("{$SNIPPET}"));
        assert!(!is_placeholder("{$SNIPPET"));
    }
}
