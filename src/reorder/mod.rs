//! Translates a drag gesture into a new ordering.
//!
//! The drag-and-drop layer reports where an item was picked up and where it
//! was released. Dropping outside a valid zone gives no destination.

use serde::{ Deserialize, Serialize };

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropLocation {
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropEvent {
    pub source: DropLocation,
    pub destination: Option<DropLocation>,
}

impl DropEvent {
    pub fn new(from: usize, to: usize) -> Self {
        Self {
            source: DropLocation { index: from },
            destination: Some(DropLocation { index: to }),
        }
    }

    pub fn outside(from: usize) -> Self {
        Self {
            source: DropLocation { index: from },
            destination: None,
        }
    }
}

/// Removes the element at `from` and reinserts it at `to`.
/// Both indices must be in bounds.
pub fn move_item<T: Clone>(items: &[T], from: usize, to: usize) -> Vec<T> {
    let mut reordered = items.to_vec();
    let moved = reordered.remove(from);
    reordered.insert(to, moved);
    reordered
}

/// `None` means nothing changes and nothing should be sent: no destination,
/// same position, or an index outside the list.
pub fn apply_drop<T: Clone>(items: &[T], event: &DropEvent) -> Option<Vec<T>> {
    let destination = event.destination?;
    let (from, to) = (event.source.index, destination.index);
    if from == to || from >= items.len() || to >= items.len() {
        return None;
    }
    Some(move_item(items, from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letters() -> Vec<&'static str> {
        vec!["A", "B", "C", "D"]
    }

    #[test]
    fn drag_third_to_top() {
        assert_eq!(apply_drop(&letters(), &DropEvent::new(2, 0)), Some(vec!["C", "A", "B", "D"]));
    }

    #[test]
    fn first_and_last_boundaries() {
        let items = vec![1, 2, 3, 4, 5];
        assert_eq!(apply_drop(&items, &DropEvent::new(0, 4)), Some(vec![2, 3, 4, 5, 1]));
        assert_eq!(apply_drop(&items, &DropEvent::new(4, 0)), Some(vec![5, 1, 2, 3, 4]));
    }

    #[test]
    fn matches_remove_then_insert_for_every_pair() {
        let items = vec!['a', 'b', 'c', 'd', 'e'];
        for from in 0..items.len() {
            for to in 0..items.len() {
                let mut expected = items.clone();
                let moved = expected.remove(from);
                expected.insert(to, moved);
                let result = apply_drop(&items, &DropEvent::new(from, to));
                if from == to {
                    assert_eq!(result, None);
                } else {
                    assert_eq!(result, Some(expected));
                }
            }
        }
    }

    #[test]
    fn empty_and_single_lists_never_change() {
        let empty: Vec<u8> = Vec::new();
        assert_eq!(apply_drop(&empty, &DropEvent::new(0, 0)), None);
        assert_eq!(apply_drop(&empty, &DropEvent::new(0, 1)), None);
        assert_eq!(apply_drop(&[7], &DropEvent::new(0, 0)), None);
    }

    #[test]
    fn drop_outside_or_out_of_range_is_ignored() {
        assert_eq!(apply_drop(&letters(), &DropEvent::outside(1)), None);
        assert_eq!(apply_drop(&letters(), &DropEvent::new(1, 9)), None);
    }
}
