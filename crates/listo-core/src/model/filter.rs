use super::item::{Item, Label};

/// Search words plus an optional label, as typed into the search bar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    /// Lowercased search words; every one must occur in the description.
    pub words: Vec<String>,
    pub label: Option<Label>,
}

impl Filter {
    /// Build a filter from a raw search phrase, splitting on whitespace.
    #[must_use]
    pub fn new<S: AsRef<str>>(phrases: &[S], label: Option<Label>) -> Self {
        let words = phrases
            .iter()
            .flat_map(|p| p.as_ref().split_whitespace())
            .map(str::to_lowercase)
            .collect();
        Self { words, label }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty() && self.label.is_none()
    }

    #[must_use]
    pub fn matches(&self, item: &Item) -> bool {
        if let Some(label) = &self.label {
            if !item.has_label(label) {
                return false;
            }
        }
        let desc = item.description.to_lowercase();
        self.words.iter().all(|word| desc.contains(word.as_str()))
    }

    /// Items passing the filter, in source order.
    pub fn apply<'a>(&'a self, items: &'a [Item]) -> impl Iterator<Item = &'a Item> + 'a {
        items.iter().filter(move |item| self.matches(item))
    }
}

/// True when every item shares one status (vacuously true when empty).
#[must_use]
pub fn uniform_status<'a>(items: impl IntoIterator<Item = &'a Item>) -> bool {
    let mut iter = items.into_iter();
    let Some(first) = iter.next() else {
        return true;
    };
    iter.all(|item| item.status == first.status)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Item> {
        let mut done = Item::new(2, "Learn UI design", vec![Label::Red, Label::Blue]);
        done.status = true;
        vec![
            Item::new(1, "Finish the todo-app", vec![Label::Red]),
            done,
            Item::new(3, "Buy milk", vec![]),
        ]
    }

    #[test]
    fn empty_filter_matches_everything() {
        let items = sample();
        let filter = Filter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&items).count(), 3);
    }

    #[test]
    fn words_are_case_insensitive_and_all_required() {
        let items = sample();
        let filter = Filter::new(&["TODO finish"], None);
        let keys: Vec<_> = filter.apply(&items).map(|i| i.key).collect();
        assert_eq!(keys, vec![1]);

        let filter = Filter::new(&["todo", "milk"], None);
        assert_eq!(filter.apply(&items).count(), 0);
    }

    #[test]
    fn label_filter_requires_label() {
        let items = sample();
        let filter = Filter::new::<&str>(&[], Some(Label::Blue));
        let keys: Vec<_> = filter.apply(&items).map(|i| i.key).collect();
        assert_eq!(keys, vec![2]);
    }

    #[test]
    fn uniform_status_detects_mixed_lists() {
        let items = sample();
        assert!(!uniform_status(&items));
        assert!(uniform_status(items.iter().filter(|i| !i.status)));
        assert!(uniform_status(std::iter::empty()));
    }
}
