//! Add/remove/edit row lists for profile forms.

/// Rows that can be recognised as left unfilled.
pub trait Blank {
    fn is_blank(&self) -> bool;
}

impl Blank for String {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

/// An ordered list of form rows.
///
/// Index-based edits that miss the list are ignored and reported through the
/// return value rather than panicking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableList<T> {
    rows: Vec<T>,
}

impl<T> Default for EditableList<T> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<T> EditableList<T> {
    pub fn new(rows: Vec<T>) -> Self {
        Self { rows }
    }

    pub fn push(&mut self, row: T) {
        self.rows.push(row);
    }

    /// Remove and return row `index`, or `None` if out of range.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        (index < self.rows.len()).then(|| self.rows.remove(index))
    }

    /// Edit row `index` in place. Returns `false` if out of range.
    pub fn update(&mut self, index: usize, f: impl FnOnce(&mut T)) -> bool {
        match self.rows.get_mut(index) {
            Some(row) => {
                f(row);
                true
            }
            None => false,
        }
    }

    /// Replace row `index`. Returns `false` if out of range.
    pub fn set(&mut self, index: usize, row: T) -> bool {
        self.update(index, |slot| *slot = row)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.rows.iter()
    }
}

impl<T: Default> EditableList<T> {
    /// Wrap `rows`, adding one blank row when there are none.
    pub fn with_blank_row(rows: Vec<T>) -> Self {
        let mut list = Self::new(rows);
        if list.is_empty() {
            list.push_blank();
        }
        list
    }

    pub fn push_blank(&mut self) {
        self.rows.push(T::default());
    }
}

impl<T: Blank> EditableList<T> {
    /// The filled-in rows, in order.
    pub fn compact(self) -> Vec<T> {
        self.rows.into_iter().filter(|row| !row.is_blank()).collect()
    }
}

impl<'a, T> IntoIterator for &'a EditableList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl<T> FromIterator<T> for EditableList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
