use hashbrown::HashSet;

use crate::getter_fn;

const ID_WIDTH: usize = 6;

/// Mints globally unique entity ids.
///
/// A caller-suggested id is honored verbatim the first time it is seen;
/// otherwise a fresh `prefix` + zero-padded counter id is synthesized.
/// Issued ids are never recycled.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    prefix:  String,
    width:   usize,
    counter: u64,
    issued:  HashSet<String>,
}

impl IdAllocator {
    pub fn new(
        prefix: &str,
        width: usize,
    ) -> Self {
        IdAllocator {
            prefix: prefix.to_string(),
            width,
            counter: 0,
            issued: HashSet::new(),
        }
    }

    /// The allocator for transcript ids.
    pub fn transcripts() -> Self {
        IdAllocator::new("trx", ID_WIDTH)
    }

    /// The allocator for feature ids.
    pub fn features() -> Self {
        IdAllocator::new("ftr", ID_WIDTH)
    }

    pub fn allocate(
        &mut self,
        suggestion: Option<&str>,
    ) -> String {
        if let Some(suggested) = suggestion {
            if !self.issued.contains(suggested) {
                self.issued.insert(suggested.to_string());
                return suggested.to_string();
            }
        }
        // no suggestion, or it was not unique
        loop {
            let id = format!(
                "{}{:0width$}",
                self.prefix,
                self.counter,
                width = self.width
            );
            self.counter += 1;
            if !self.issued.contains(&id) {
                self.issued.insert(id.clone());
                return id;
            }
        }
    }

    /// Marks ids as issued without returning them. Used after import so
    /// later allocations cannot collide with loaded ids.
    pub fn reseed<I, S>(
        &mut self,
        ids: I,
    ) where
        I: IntoIterator<Item = S>,
        S: Into<String>, {
        self.issued.extend(ids.into_iter().map(Into::into));
    }

    getter_fn!(issued, HashSet<String>);
}

impl Default for IdAllocator {
    fn default() -> Self {
        IdAllocator::new("", ID_WIDTH)
    }
}
