//! # Headers HTTP
//! src/http/headers.rs
//!
//! Colección ordenada de headers. Los nombres se comparan sin distinguir
//! mayúsculas (`content-length` == `Content-Length`), pero se conserva la
//! forma en que llegaron para serializar.

const TOKEN_CHARS: &str = "!#$%&'*+-.^_`|~";

/// Lista ordenada de pares `(nombre, valor)`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Agrega un header sin tocar los existentes (un request puede repetir nombres)
    pub fn append(&mut self, name: &str, value: &str) {
        self.entries.push((name.to_string(), value.to_string()));
    }

    /// Establece un header, reemplazando cualquier valor previo con el mismo nombre
    ///
    /// La posición del primer valor existente se conserva.
    pub fn set(&mut self, name: &str, value: &str) {
        match self.position(name) {
            Some(idx) => {
                self.entries[idx].1 = value.to_string();
                let mut seen = 0;
                self.entries.retain(|(n, _)| {
                    if n.eq_ignore_ascii_case(name) {
                        seen += 1;
                        seen == 1
                    } else {
                        true
                    }
                });
            }
            None => self.append(name, value),
        }
    }

    /// Primer valor para `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|idx| self.entries[idx].1.as_str())
    }

    /// Todos los valores para `name`, en orden de llegada
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(name))
    }
}

/// Verifica que `name` sea un token válido para nombre de header (RFC 9110)
pub fn is_token(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || TOKEN_CHARS.contains(c))
}
