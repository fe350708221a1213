//! Lightweight parsing of C++ type spellings.
//!
//! Only what the classifier and emitter need: peeling cv-qualifiers,
//! elaborated keywords and trailing declarators off a spelling, and pulling
//! the argument out of a single-argument template.

/// Outermost indirection of a spelling.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Indirection {
    /// By value.
    None,
    /// `T *`
    Pointer,
    /// `T &`
    LvalueRef,
    /// `T &&`
    RvalueRef,
    /// Two or more declarators, e.g. `T **` or `T *&`.
    Multiple,
}

/// A spelling split into its base type and declarators.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeShape {
    /// Spelling with cv-qualifiers, elaborated keywords and declarators
    /// removed.
    pub base: String,
    pub indirection: Indirection,
    /// The base type is `const`-qualified.
    pub is_const: bool,
}

const CV_QUALIFIERS: &[&str] = &["const", "volatile"];
const ELABORATED_KEYWORDS: &[&str] = &["struct", "class", "enum", "union", "typename"];

impl TypeShape {
    pub fn parse(spelling: &str) -> TypeShape {
        let mut rest = spelling.trim();
        let mut declarators = Vec::new();
        let mut is_const = false;

        // Trailing declarators, outermost first. A qualifier on the pointer
        // itself (`T *const`) is dropped.
        loop {
            if let Some(stripped) = rest.strip_suffix("&&") {
                declarators.push(Indirection::RvalueRef);
                rest = stripped.trim_end();
            } else if let Some(stripped) = rest.strip_suffix('&') {
                declarators.push(Indirection::LvalueRef);
                rest = stripped.trim_end();
            } else if let Some(stripped) = rest.strip_suffix('*') {
                declarators.push(Indirection::Pointer);
                rest = stripped.trim_end();
            } else if let Some((stripped, keyword)) =
                strip_trailing_keyword(rest, CV_QUALIFIERS)
            {
                if keyword == "const" && !stripped.ends_with(['*', '&']) {
                    is_const = true;
                }
                rest = stripped;
            } else {
                break;
            }
        }

        while let Some((stripped, keyword)) = strip_leading_keyword(rest, CV_QUALIFIERS)
            .or_else(|| strip_leading_keyword(rest, ELABORATED_KEYWORDS))
        {
            if keyword == "const" {
                is_const = true;
            }
            rest = stripped;
        }

        let indirection = match declarators.as_slice() {
            [] => Indirection::None,
            [single] => *single,
            _ => Indirection::Multiple,
        };

        TypeShape {
            base: rest.to_owned(),
            indirection,
            is_const,
        }
    }

    /// Whether anything was peeled off `spelling`.
    pub fn is_decorated(&self, spelling: &str) -> bool {
        self.base != spelling.trim()
    }

    #[inline]
    pub fn is_pointer(&self) -> bool {
        self.indirection == Indirection::Pointer
    }
}

fn strip_leading_keyword<'a>(
    s: &'a str,
    keywords: &[&'static str],
) -> Option<(&'a str, &'static str)> {
    keywords.iter().find_map(|&keyword| {
        let rest = s.strip_prefix(keyword)?;
        rest.starts_with(char::is_whitespace)
            .then(|| (rest.trim_start(), keyword))
    })
}

fn strip_trailing_keyword<'a>(
    s: &'a str,
    keywords: &[&'static str],
) -> Option<(&'a str, &'static str)> {
    keywords.iter().find_map(|&keyword| {
        let rest = s.strip_suffix(keyword)?;
        let boundary = rest.is_empty()
            || rest.ends_with(char::is_whitespace)
            || rest.ends_with(['*', '&']);
        (boundary && !rest.trim_end().is_empty()).then(|| (rest.trim_end(), keyword))
    })
}

/// Result of extracting a template argument.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SequenceArgument<'a> {
    /// Exactly one argument, without nested templates.
    Single(&'a str),
    /// The argument itself is a template instance.
    Nested,
    /// More than one top-level argument.
    Multiple,
}

/// Extract the argument of `spelling` when it names one of `templates`.
///
/// The spelling must start with a template name immediately followed by
/// `<` and end with the matching `>`. Returns `None` when it is not an
/// instance of any of them.
pub fn sequence_argument<'a>(
    spelling: &'a str,
    templates: &[&str],
) -> Option<SequenceArgument<'a>> {
    let spelling = spelling.trim();
    let spelling = spelling.strip_prefix("::").unwrap_or(spelling);
    let open = spelling.find('<')?;
    let head = spelling[..open].trim_end();
    if !templates.contains(&head) {
        return None;
    }
    let inner = spelling[open + 1..].strip_suffix('>')?.trim();

    if inner.contains(['<', '>']) {
        return Some(SequenceArgument::Nested);
    }
    if inner.contains(',') {
        return Some(SequenceArgument::Multiple);
    }
    Some(SequenceArgument::Single(inner))
}
