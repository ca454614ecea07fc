//! Extraction of `#include "..."` directives from C/C++ source text.

/// Return the quoted include targets of `text` in order of appearance.
///
/// Only quoted includes are reported. Angle-bracket includes name system
/// headers and are skipped, as are directives whose quote is never closed on
/// the same line. Duplicates are kept.
pub fn find_includes(text: &str) -> Vec<String> {
    text.split(['\n', '\r'])
        .filter_map(parse_include_line)
        .collect()
}

fn parse_include_line(line: &str) -> Option<String> {
    let rest = line.trim_start_matches([' ', '\t']).strip_prefix('#')?;
    let rest = rest.trim_start_matches([' ', '\t']).strip_prefix("include")?;

    // `#include"x.h"` and `#includes` are not directives
    if !rest.starts_with(|c: char| c.is_ascii_whitespace()) {
        return None;
    }

    let quoted = rest.trim_start_matches([' ', '\t']).strip_prefix('"')?;
    let end = quoted.find('"')?;
    Some(quoted[..end].to_string())
}
