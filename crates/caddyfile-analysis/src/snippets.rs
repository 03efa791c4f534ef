use std::collections::BTreeSet;

use caddyfile_parse::File;

/// Names of all snippets declared in `file`, sorted and without duplicates.
pub fn collect_snippet_names<'src>(file: &File<'src>) -> Vec<&'src str> {
    file.snippets()
        .filter_map(|site| site.snippet_name())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
