use std::{
    collections::HashSet,
    fmt,
    sync::{Arc, Mutex, OnceLock},
};

/// An interned path component.
///
/// Interning makes cloning and hashing a token cheap (an [`Arc`] bump and a
/// pointer-sized hash) but is a performance choice, not a semantic one:
/// equality always falls back to comparing the underlying bytes.
#[derive(Clone, Eq)]
pub struct Token(Arc<str>);

impl Token {
    /// The distinguished ellipsis token, matching any (possibly empty) span
    /// of intermediate tokens when stored in a path.
    pub const ELLIPSIS: &'static str = "...";

    /// Intern `name`, returning the shared [`Token`] for it.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty: the empty token is not a permitted
    /// insertable name.
    pub fn new(name: &str) -> Self {
        assert!(!name.is_empty(), "token names must not be empty");
        Self(intern(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_ellipsis(&self) -> bool {
        &*self.0 == Self::ELLIPSIS
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl std::hash::Hash for Token {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl PartialEq<str> for Token {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

static INTERN_TABLE: OnceLock<Mutex<HashSet<Arc<str>>>> = OnceLock::new();

fn intern(name: &str) -> Arc<str> {
    let table = INTERN_TABLE.get_or_init(|| Mutex::new(HashSet::new()));
    let mut table = table.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    if let Some(existing) = table.get(name) {
        return Arc::clone(existing);
    }

    let interned: Arc<str> = Arc::from(name);
    table.insert(Arc::clone(&interned));
    interned
}

/// Split `path` on `/`, discarding empty tokens produced by leading,
/// trailing, or duplicated separators.
///
/// ```text
/// "/a/b"  -> ["a", "b"]
/// "/"     -> []
/// "a//b/" -> ["a", "b"]
/// ```
pub fn tokenize(path: &str) -> Vec<Token> {
    path.split('/')
        .filter(|token| !token.is_empty())
        .map(Token::new)
        .collect()
}

/// Join tokens back into a `/`-prefixed path string.
pub fn join_path(tokens: &[Token]) -> String {
    let mut out = String::from("/");
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            out.push('/');
        }
        out.push_str(token.as_str());
    }
    out
}
