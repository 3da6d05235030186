//! Reading the module path out of `go.mod`.

/// Return the path named by the `module` directive, if any.
///
/// Handles `// comments`, quoted paths and the parenthesized block form.
pub fn parse_module_path(content: &str) -> Option<String> {
    let mut in_block = false;
    for line in content.lines() {
        let line = strip_comment(line).trim();
        if line.is_empty() {
            continue;
        }

        if in_block {
            if line == ")" {
                in_block = false;
                continue;
            }
            return Some(unquote_path(line));
        }

        let Some(rest) = line.strip_prefix("module") else {
            continue;
        };
        if !rest.starts_with(|c: char| c.is_whitespace() || c == '"' || c == '(') {
            continue;
        }
        let rest = rest.trim();
        if rest == "(" {
            in_block = true;
            continue;
        }
        return Some(unquote_path(rest));
    }
    None
}

fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn unquote_path(text: &str) -> String {
    text.trim_matches(|c| c == '"' || c == '`').to_string()
}
