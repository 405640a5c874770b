
use crate::{Merge, MmrElement, Result, leaf_hash};

/// Create a Blake3 leaf from an integer (for test convenience).
pub(crate) fn leaf_from_u32(i: u32) -> MmrElement {
    MmrElement::from(leaf_hash(&i.to_le_bytes()))
}

/// Single-letter leaf: 0 -> "a", 1 -> "b", ...
pub(crate) fn letter(i: u32) -> MmrElement {
    MmrElement::from(vec![b'a' + i as u8])
}

/// Merge that renders the tree shape: `merge("a", "b") == "(a b)"`.
pub(crate) fn paren_merge(left: &MmrElement, right: &MmrElement) -> Result<MmrElement> {
    Ok(MmrElement::new(
        format!("({} {})", as_str(left), as_str(right)).into_bytes(),
    ))
}

pub(crate) fn as_str(elem: &MmrElement) -> &str {
    std::str::from_utf8(elem).expect("utf8 element")
}

/// Root computed straight from the leaves: split them into perfect trees of
/// decreasing size, hash each tree recursively, then fold the peaks from the
/// right.
pub(crate) fn naive_root<M: Merge>(merge: &M, leaves: &[MmrElement]) -> Option<MmrElement> {
    let mut peaks = Vec::new();
    let mut rest = leaves;
    while !rest.is_empty() {
        let width = 1usize << (usize::BITS - 1 - rest.len().leading_zeros());
        let (tree, tail) = rest.split_at(width);
        peaks.push(perfect_root(merge, tree));
        rest = tail;
    }
    let mut acc = peaks.pop()?;
    while let Some(left) = peaks.pop() {
        acc = merge.merge(&left, &acc).expect("merge");
    }
    Some(acc)
}

fn perfect_root<M: Merge>(merge: &M, leaves: &[MmrElement]) -> MmrElement {
    if leaves.len() == 1 {
        return leaves[0].clone();
    }
    let (left, right) = leaves.split_at(leaves.len() / 2);
    merge
        .merge(&perfect_root(merge, left), &perfect_root(merge, right))
        .expect("merge")
}
