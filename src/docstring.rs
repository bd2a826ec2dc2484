//! Docstring normalization.

const TAB_WIDTH: usize = 8;

/// Normalize a handler docstring into a request description.
///
/// The first line is stripped, the remaining lines lose their common indentation and
/// trailing whitespace, and leading/trailing blank lines are dropped. Tabs are expanded to
/// 8-column tab stops first.
pub fn trim_docstring(docstring: Option<&str>) -> String {
    let docstring = match docstring {
        Some(d) if !d.is_empty() => d,
        _ => return String::new(),
    };

    let lines: Vec<String> = docstring.lines().map(expand_tabs).collect();
    let Some((first, rest)) = lines.split_first() else {
        return String::new();
    };

    let indent = rest
        .iter()
        .filter(|line| !line.trim_start().is_empty())
        .map(|line| line.chars().count() - line.trim_start().chars().count())
        .min();

    let mut trimmed = vec![first.trim().to_string()];
    if let Some(indent) = indent {
        trimmed.extend(
            rest.iter()
                .map(|line| line.chars().skip(indent).collect::<String>().trim_end().to_string()),
        );
    }

    while trimmed.last().is_some_and(|line| line.is_empty()) {
        trimmed.pop();
    }
    let leading_blank = trimmed.iter().take_while(|line| line.is_empty()).count();

    trimmed[leading_blank..].join("\n")
}

fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut column = 0;
    for ch in line.chars() {
        if ch == '\t' {
            let spaces = TAB_WIDTH - column % TAB_WIDTH;
            out.extend(std::iter::repeat(' ').take(spaces));
            column += spaces;
        } else {
            out.push(ch);
            column += 1;
        }
    }
    out
}
