//! Parsing of clang function type spellings such as
//! `double (int, const gp_Pnt &) const`.

/// Parts of a function type spelling the generator needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionType<'a> {
    /// Result type spelling.
    pub ret: &'a str,
    /// `const`-qualified member function.
    pub is_const: bool,
}

impl<'a> FunctionType<'a> {
    /// Split `spelling` at its top-level parameter list.
    ///
    /// Returns `None` when there is no parameter list outside of template
    /// brackets.
    pub fn parse(spelling: &'a str) -> Option<FunctionType<'a>> {
        let open = top_level_paren(spelling)?;
        let close = matching_paren(spelling, open)?;
        let head = spelling[..open].trim();
        let tail = &spelling[close + 1..];

        let (qualifiers, trailing_ret) = match tail.find("->") {
            Some(arrow) => (&tail[..arrow], Some(tail[arrow + 2..].trim())),
            None => (tail, None),
        };
        let is_const = qualifiers.split_whitespace().any(|word| word == "const");
        let ret = match trailing_ret {
            Some(ret) if head == "auto" && !ret.is_empty() => ret,
            _ => head,
        };
        Some(FunctionType { ret, is_const })
    }
}

fn top_level_paren(spelling: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (index, c) in spelling.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            '(' if depth == 0 => return Some(index),
            _ => {}
        }
    }
    None
}

fn matching_paren(spelling: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (index, c) in spelling[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + index);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests;
