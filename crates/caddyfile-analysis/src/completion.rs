//! Mapping a cursor position to what may be typed there.

use caddyfile_parse::{Directive, File, Position};

use crate::schema::{self, BodySchema};

/// What kind of completion applies at a cursor position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionContext {
    /// Nothing sensible can be suggested here.
    NotCompletable,
    /// A directive name in a site block or container body.
    TopLevelNames(&'static [&'static str]),
    /// A subdirective name inside `parent`'s body.
    SubdirectiveNames {
        parent: String,
        names: &'static [&'static str],
    },
    /// The snippet name argument of `import`, typed so far.
    SnippetNamePrefix(String),
    /// Inside a body whose contents are not modeled name by name.
    FreeformNoCompletion,
}

/// Work out what may be typed at `position` in `source`, which `file` was
/// parsed from. Name lists are sorted ascending.
pub fn resolve_completion_context(
    file: &File<'_>,
    source: &str,
    position: Position,
) -> CompletionContext {
    let Some(line) = source.split('\n').nth(position.line as usize) else {
        return CompletionContext::NotCompletable;
    };
    let line = line.strip_suffix('\r').unwrap_or(line);
    let before: String = line.chars().take(position.character as usize).collect();
    let typed = before.trim_start_matches([' ', '\t']);

    if !typed.contains([' ', '\t']) {
        return directive_name_context(file, position.line);
    }
    match import_prefix(typed) {
        Some(prefix) => CompletionContext::SnippetNamePrefix(prefix.to_string()),
        None => CompletionContext::NotCompletable,
    }
}

/// The partial first argument of an `import` line, if the cursor is on it.
fn import_prefix(typed: &str) -> Option<&str> {
    let rest = typed.strip_prefix("import")?;
    if !rest.starts_with([' ', '\t']) {
        return None;
    }
    let arg = rest.trim_start_matches([' ', '\t']);
    if arg.contains([' ', '\t']) {
        return None;
    }
    Some(arg)
}

fn directive_name_context(file: &File<'_>, line: u32) -> CompletionContext {
    let site = file
        .sites
        .iter()
        .find(|site| site.start_line < line && line < site.end_line);
    match site {
        Some(site) => directive_list_context(&site.directives, line),
        None => CompletionContext::NotCompletable,
    }
}

/// Descend through containers to the directive list that holds `line`.
fn directive_list_context(directives: &[Directive<'_>], line: u32) -> CompletionContext {
    let Some(directive) = enclosing(directives, line) else {
        return CompletionContext::TopLevelNames(schema::TOP_LEVEL);
    };
    let name = directive.name();
    if schema::is_container(name) {
        return directive_list_context(&directive.body, line);
    }
    match schema::subdirectives_for(name) {
        BodySchema::Unmodeled => CompletionContext::NotCompletable,
        BodySchema::Freeform => CompletionContext::FreeformNoCompletion,
        BodySchema::Names(names) => subdirective_context(directive, names, line),
    }
}

fn subdirective_context(
    directive: &Directive<'_>,
    names: &'static [&'static str],
    line: u32,
) -> CompletionContext {
    let Some(sub) = enclosing(&directive.body, line) else {
        return CompletionContext::SubdirectiveNames {
            parent: directive.name().to_string(),
            names,
        };
    };
    let nested = sub
        .first_arg()
        .and_then(|arg| Some((arg, schema::sub_subdirectives_for(sub.name(), arg)?)));
    match nested {
        Some((arg, names)) => CompletionContext::SubdirectiveNames {
            parent: format!("{} {arg}", sub.name()),
            names,
        },
        None => CompletionContext::NotCompletable,
    }
}

/// The first directive whose body strictly contains `line`.
fn enclosing<'a, 'src>(directives: &'a [Directive<'src>], line: u32) -> Option<&'a Directive<'src>> {
    directives
        .iter()
        .find(|directive| directive.has_body() && directive.body_contains_line(line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use caddyfile_parse::parse;

    /// Resolve at the `|` marker, which is removed from the source first.
    fn context_at(marked: &str) -> CompletionContext {
        let (line, character) = marked
            .lines()
            .enumerate()
            .find_map(|(line, text)| {
                let column = text.find('|')?;
                Some((line as u32, text[..column].chars().count() as u32))
            })
            .expect("source has a | marker");
        let source = marked.replacen('|', "", 1);
        let (file, _) = parse(&source);
        resolve_completion_context(&file, &source, Position::new(line, character))
    }

    fn subdirective_names(context: &CompletionContext) -> (&str, &[&str]) {
        match context {
            CompletionContext::SubdirectiveNames { parent, names } => (parent.as_str(), *names),
            other => panic!("expected subdirective names, got {other:?}"),
        }
    }

    #[test]
    fn test_reverse_proxy_body() {
        let context = context_at("example.com {\n\treverse_proxy {\n\t\t|\n\t}\n}\n");
        let (parent, names) = subdirective_names(&context);
        assert_eq!(parent, "reverse_proxy");
        for expected in ["to", "transport", "lb_policy"] {
            assert!(names.contains(&expected), "{expected}");
        }
        assert!(!names.contains(&"tls"));
        assert!(names.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_site_level() {
        assert_eq!(
            context_at("example.com {\n\tre|\n}\n"),
            CompletionContext::TopLevelNames(schema::TOP_LEVEL)
        );
        // the line after a one-line directive is still site level
        assert_eq!(
            context_at("example.com {\n\trespond ok\n\t|\n}\n"),
            CompletionContext::TopLevelNames(schema::TOP_LEVEL)
        );
    }

    #[test]
    fn test_address_and_closing_lines_are_excluded() {
        assert_eq!(
            context_at("exa|mple.com {\n\trespond ok\n}\n"),
            CompletionContext::NotCompletable
        );
        assert_eq!(
            context_at("example.com {\n\trespond ok\n}|\n"),
            CompletionContext::NotCompletable
        );
        assert_eq!(context_at("|\nexample.com {\n}\n"), CompletionContext::NotCompletable);
    }

    #[test]
    fn test_global_block_is_not_completable() {
        assert_eq!(
            context_at("{\n\t|\n}\nexample.com {\n}\n"),
            CompletionContext::NotCompletable
        );
    }

    #[test]
    fn test_argument_position() {
        assert_eq!(
            context_at("example.com {\n\treverse_proxy loc|\n}\n"),
            CompletionContext::NotCompletable
        );
    }

    #[test]
    fn test_containers_recurse() {
        assert_eq!(
            context_at("example.com {\n\thandle /api/* {\n\t\troute {\n\t\t\t|\n\t\t}\n\t}\n}\n"),
            CompletionContext::TopLevelNames(schema::TOP_LEVEL)
        );
        let context = context_at(
            "example.com {\n\thandle {\n\t\tencode {\n\t\t\t|\n\t\t}\n\t}\n}\n",
        );
        let (parent, names) = subdirective_names(&context);
        assert_eq!(parent, "encode");
        assert!(names.contains(&"gzip"));
    }

    #[test]
    fn test_freeform_and_unmodeled() {
        assert_eq!(
            context_at("example.com {\n\theader {\n\t\t|\n\t}\n}\n"),
            CompletionContext::FreeformNoCompletion
        );
        assert_eq!(
            context_at("example.com {\n\trespond {\n\t\t|\n\t}\n}\n"),
            CompletionContext::NotCompletable
        );
    }

    #[test]
    fn test_sub_subdirective_body() {
        let context = context_at(
            "example.com {\n\treverse_proxy {\n\t\ttransport http {\n\t\t\t|\n\t\t}\n\t}\n}\n",
        );
        let (parent, names) = subdirective_names(&context);
        assert_eq!(parent, "transport http");
        assert!(names.contains(&"read_timeout"));

        assert_eq!(
            context_at("example.com {\n\treverse_proxy {\n\t\thandle_response {\n\t\t\t|\n\t\t}\n\t}\n}\n"),
            CompletionContext::NotCompletable
        );
    }

    #[test]
    fn test_import_prefix() {
        assert_eq!(
            context_at("(common) {\n}\nexample.com {\n\timport co|\n}\n"),
            CompletionContext::SnippetNamePrefix("co".to_string())
        );
        assert_eq!(
            context_at("example.com {\n\timport |\n}\n"),
            CompletionContext::SnippetNamePrefix(String::new())
        );
        assert_eq!(
            context_at("example.com {\n\timport common ar|\n}\n"),
            CompletionContext::NotCompletable
        );
        assert_eq!(
            context_at("example.com {\n\timports x|\n}\n"),
            CompletionContext::NotCompletable
        );
    }

    #[test]
    fn test_snippet_block_is_site_level() {
        assert_eq!(
            context_at("(common) {\n\t|\n}\n"),
            CompletionContext::TopLevelNames(schema::TOP_LEVEL)
        );
    }

    #[test]
    fn test_position_past_end() {
        let (file, _) = parse("example.com {\n}\n");
        assert_eq!(
            resolve_completion_context(&file, "example.com {\n}\n", Position::new(10, 0)),
            CompletionContext::NotCompletable
        );
    }
}
