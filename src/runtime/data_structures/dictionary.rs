use crate::runtime::{
    data_structures::{Cell, flash::Flash},
    error::{self, ErrKind, throw},
    interpreter::Machine,
};

/// A native word's handler.  Primitives are plain functions over the
/// machine; everything they need lives there.
pub type Primitive = fn(&mut Machine) -> error::Result<()>;

/// How a dictionary entry behaves when looked up.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Flag {
    /// Compiled into definitions, executed at run time.
    Normal,

    /// Executed immediately, even while compiling.
    Immediate,

    /// A smudged entry mid-definition; invisible to lookup.
    Undefined,
}

/// The entry's code field.  The original's raw function pointers become
/// a tagged dispatch: primitives carry their handler, while the
/// defining-word shapes carry a behaviour interpreted against the
/// entry's body.
#[derive(Clone, Copy)]
pub enum WordCode {
    /// A native handler.
    Native(Primitive),

    /// Run the threaded body through the inner interpreter.
    Colon,

    /// Push the body address; the default behaviour of CREATEd words.
    PushBody,

    /// Push the cell stored at the body address.
    Constant,
}

/// One dictionary entry.  The name is a flash address of an interned
/// string; the body is a flash address or 0 for bodyless primitives.
#[derive(Clone)]
pub struct Entry {
    pub name: usize,
    pub code: WordCode,
    pub flag: Flag,
    pub body: usize,

    /// A short description shown by the dictionary listing.
    pub help: String,

    /// The stack signature shown by the dictionary listing.
    pub stack: String,
}

impl Entry {
    pub fn new(name: usize, code: WordCode, flag: Flag, body: usize) -> Entry {
        Entry {
            name,
            code,
            flag,
            body,
            help: String::new(),
            stack: String::new(),
        }
    }
}

/// The word dictionary.  Two tables coexist: the static primitives
/// table built at boot, and the growable colon-definition table wiped
/// by FORGET.  Execution tokens are cells: `+k` is primitive `k-1`,
/// `-k` is colon definition `k-1`, and 0 terminates a threaded body.
pub struct Dictionary {
    primitives: Vec<Entry>,
    colon_defs: Vec<Entry>,
}

impl Dictionary {
    pub fn new() -> Dictionary {
        Dictionary {
            primitives: Vec::new(),
            colon_defs: Vec::new(),
        }
    }

    /// Register a primitive, returning its execution token.
    pub fn add_primitive(&mut self, entry: Entry) -> Cell {
        self.primitives.push(entry);
        self.primitives.len() as Cell
    }

    /// Append a colon definition, returning its execution token.
    pub fn add_colon(&mut self, entry: Entry) -> Cell {
        self.colon_defs.push(entry);
        -(self.colon_defs.len() as Cell)
    }

    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    pub fn colon_count(&self) -> usize {
        self.colon_defs.len()
    }

    /// Find a word by name.  Colon definitions are searched newest
    /// first (skipping smudged entries), then the primitives; the first
    /// match wins.
    pub fn lookup(&self, flash: &Flash, token: &str) -> Option<Cell> {
        for (index, entry) in self.colon_defs.iter().enumerate().rev() {
            if entry.flag != Flag::Undefined && flash.str_eq(entry.name, token) {
                return Some(-((index + 1) as Cell));
            }
        }

        for (index, entry) in self.primitives.iter().enumerate().rev() {
            if flash.str_eq(entry.name, token) {
                return Some((index + 1) as Cell);
            }
        }

        None
    }

    /// Resolve an execution token to its entry.
    pub fn entry(&self, xt: Cell) -> error::Result<&Entry> {
        if xt > 0 {
            let index = (xt - 1) as usize;

            if index < self.primitives.len() {
                return Ok(&self.primitives[index]);
            }
        } else if xt < 0 {
            let index = (-xt - 1) as usize;

            if index < self.colon_defs.len() {
                return Ok(&self.colon_defs[index]);
            }
        }

        throw(ErrKind::NoWord, "execute")
    }

    pub fn entry_mut(&mut self, xt: Cell) -> error::Result<&mut Entry> {
        if xt > 0 {
            let index = (xt - 1) as usize;

            if index < self.primitives.len() {
                return Ok(&mut self.primitives[index]);
            }
        } else if xt < 0 {
            let index = (-xt - 1) as usize;

            if index < self.colon_defs.len() {
                return Ok(&mut self.colon_defs[index]);
            }
        }

        throw(ErrKind::NoWord, "execute")
    }

    /// The most recently defined colon entry, if any.
    pub fn latest_colon_mut(&mut self) -> Option<&mut Entry> {
        self.colon_defs.last_mut()
    }

    /// The execution token of the most recently defined colon entry.
    pub fn latest_colon_xt(&self) -> Option<Cell> {
        if self.colon_defs.is_empty() {
            None
        } else {
            Some(-(self.colon_defs.len() as Cell))
        }
    }

    /// Drop colon definitions back to a prior count, used when a failed
    /// compile rolls back.
    pub fn truncate_colons(&mut self, count: usize) {
        self.colon_defs.truncate(count);
    }

    /// Wipe every colon definition.
    pub fn forget(&mut self) {
        self.colon_defs.clear();
    }

    /// Iterate the whole dictionary, colon definitions newest first and
    /// then the primitives, with each entry's execution token.  Feeds
    /// the dictionary listing.
    pub fn iter_listing(&self) -> impl Iterator<Item = (Cell, &Entry)> {
        let colons = self
            .colon_defs
            .iter()
            .enumerate()
            .rev()
            .map(|(index, entry)| (-((index + 1) as Cell), entry));

        let primitives = self
            .primitives
            .iter()
            .enumerate()
            .map(|(index, entry)| ((index + 1) as Cell, entry));

        colons.chain(primitives)
    }

    /// Find the colon definition whose body contains the given flash
    /// address: the entry with the largest body at or below it.  Used
    /// by the backtrace printer to name return stack cells.
    pub fn colon_containing(&self, addr: usize) -> Option<(Cell, &Entry)> {
        let mut best: Option<(Cell, &Entry)> = None;

        for (index, entry) in self.colon_defs.iter().enumerate() {
            if entry.body != 0 && entry.body <= addr {
                let better = match best {
                    Some((_, chosen)) => entry.body > chosen.body,
                    None => true,
                };

                if better {
                    best = Some((-((index + 1) as Cell), entry));
                }
            }
        }

        best
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

//////////////////////////////////////////////
/// TESTS
///
#[cfg(test)]
mod tests {
    use super::*;

    fn no_op(_machine: &mut Machine) -> error::Result<()> {
        Ok(())
    }

    fn dictionary_with_names(flash: &mut Flash, names: &[&str]) -> (Dictionary, Vec<Cell>) {
        let mut dictionary = Dictionary::new();
        let mut xts = Vec::new();

        for name in names {
            let addr = flash.str_cache(name).unwrap();
            let entry = Entry::new(addr, WordCode::Native(no_op), Flag::Normal, 0);

            xts.push(dictionary.add_primitive(entry));
        }

        (dictionary, xts)
    }

    #[test]
    fn lookup_finds_primitives_by_name() {
        let mut flash = Flash::new();
        let (dictionary, xts) = dictionary_with_names(&mut flash, &["dup", "drop"]);

        assert_eq!(dictionary.lookup(&flash, "dup"), Some(xts[0]));
        assert_eq!(dictionary.lookup(&flash, "drop"), Some(xts[1]));
        assert_eq!(dictionary.lookup(&flash, "swap"), None);
    }

    #[test]
    fn colon_definitions_shadow_primitives() {
        let mut flash = Flash::new();
        let (mut dictionary, _) = dictionary_with_names(&mut flash, &["dup"]);

        let addr = flash.str_cache("dup").unwrap();
        let xt = dictionary.add_colon(Entry::new(addr, WordCode::Colon, Flag::Normal, 100));

        assert_eq!(dictionary.lookup(&flash, "dup"), Some(xt));
        assert!(xt < 0);
    }

    #[test]
    fn smudged_entries_are_invisible() {
        let mut flash = Flash::new();
        let mut dictionary = Dictionary::new();

        let addr = flash.str_cache("half-made").unwrap();
        dictionary.add_colon(Entry::new(addr, WordCode::Colon, Flag::Undefined, 50));

        assert_eq!(dictionary.lookup(&flash, "half-made"), None);
    }

    #[test]
    fn zero_is_never_a_valid_token() {
        let dictionary = Dictionary::new();
        assert!(dictionary.entry(0).is_err());
    }

    #[test]
    fn colon_containing_picks_the_nearest_body() {
        let mut flash = Flash::new();
        let mut dictionary = Dictionary::new();

        let first = flash.str_cache("first").unwrap();
        let second = flash.str_cache("second").unwrap();

        dictionary.add_colon(Entry::new(first, WordCode::Colon, Flag::Normal, 10));
        dictionary.add_colon(Entry::new(second, WordCode::Colon, Flag::Normal, 30));

        let (_, entry) = dictionary.colon_containing(20).unwrap();
        assert_eq!(entry.body, 10);

        let (_, entry) = dictionary.colon_containing(35).unwrap();
        assert_eq!(entry.body, 30);

        assert!(dictionary.colon_containing(5).is_none());
    }
}
