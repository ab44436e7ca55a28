use std::ops::ControlFlow;

use tinyvec::ArrayVec;

/// Calls `f` with every `size`-element subset of `0..n`, in lexicographic order.
///
/// Both `n` and `size` are at most 9.
pub(super) fn combinations<F>(n: usize, size: usize, mut f: F) -> ControlFlow<()>
where
    F: FnMut(&[usize]) -> ControlFlow<()>,
{
    if size == 0 || size > n || n > 9 {
        return ControlFlow::Continue(());
    }
    let mut picked = ArrayVec::<[usize; 9]>::new();
    extend(0, n, size, &mut picked, &mut f)
}

fn extend<F>(
    start: usize,
    n: usize,
    size: usize,
    picked: &mut ArrayVec<[usize; 9]>,
    f: &mut F,
) -> ControlFlow<()>
where
    F: FnMut(&[usize]) -> ControlFlow<()>,
{
    if picked.len() == size {
        return f(picked.as_slice());
    }
    let needed = size - picked.len();
    for i in start..=n - needed {
        picked.push(i);
        extend(i + 1, n, size, picked, f)?;
        picked.pop();
    }
    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        for (n, size, expected) in [(9, 2, 36), (9, 3, 84), (9, 4, 126), (4, 4, 1), (3, 4, 0)] {
            let mut count = 0;
            let _ = combinations(n, size, |_| {
                count += 1;
                ControlFlow::Continue(())
            });
            assert_eq!(count, expected, "{size} of {n}");
        }
    }

    #[test]
    fn test_order_and_break() {
        let mut seen = Vec::new();
        let flow = combinations(4, 2, |picked| {
            seen.push(picked.to_vec());
            if picked == [1, 2] {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert!(flow.is_break());
        assert_eq!(seen, [vec![0, 1], vec![0, 2], vec![0, 3], vec![1, 2]]);
    }
}
