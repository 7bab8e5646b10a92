// Reorder engine - drag-and-drop list transformation

/// Final position of the moved element once it has been taken out of a list of `len`.
///
/// The target index refers to the list before removal, so it shifts down by one when
/// the source sat in front of it. Requires `source < len`.
pub fn insertion_index(len: usize, source: usize, target: usize, drop_before: bool) -> usize {
    let mut position = target;
    if source < position {
        position -= 1;
    }
    if !drop_before {
        position += 1;
    }
    position.min(len.saturating_sub(1))
}

/// Move the element at `source` next to the element at `target`.
///
/// `drop_before` places it in front of the target, otherwise behind it. An
/// out-of-range source or `source == target` returns the list unchanged.
pub fn reorder<T>(mut list: Vec<T>, source: usize, target: usize, drop_before: bool) -> Vec<T> {
    if source == target || source >= list.len() {
        return list;
    }

    let position = insertion_index(list.len(), source, target, drop_before);
    let moved = list.remove(source);
    list.insert(position, moved);
    list
}

/// Whether a release at `pointer_x` fell on the left half of a target spanning `left..left + width`.
pub fn drops_before(pointer_x: f64, left: f64, width: f64) -> bool {
    pointer_x < left + width / 2.0
}
