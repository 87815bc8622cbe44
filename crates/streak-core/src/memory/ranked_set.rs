//! Order-statistic sorted set.
//!
//! A treap keyed by `(score, member key)` in descending order, with subtree sizes so that
//! insert, remove and rank run in expected O(log n) and a rank range of `k` entries is
//! read in O(log n + k). A side table maps each member to its current score.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::value_objects::UserId;

/// Tree key, ordered by score descending, then by the member's decimal key
/// descending as a byte string. Redis compares sorted-set members the same way,
/// so `9` ranks ahead of `10` on equal scores.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Key {
    score: i64,
    label: String,
    member: UserId,
}

impl Key {
    fn new(score: i64, member: UserId) -> Self {
        Self {
            score,
            label: member.member_key(),
            member,
        }
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.score, other.label.as_bytes()).cmp(&(self.score, self.label.as_bytes()))
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

type Link = Option<Box<Node>>;

#[derive(Debug)]
struct Node {
    key: Key,
    priority: u64,
    size: usize,
    left: Link,
    right: Link,
}

impl Node {
    fn new(key: Key) -> Self {
        Self {
            key,
            priority: rand::random(),
            size: 1,
            left: None,
            right: None,
        }
    }

    fn update(&mut self) {
        self.size = 1 + size(&self.left) + size(&self.right);
    }
}

fn size(link: &Link) -> usize {
    link.as_ref().map_or(0, |node| node.size)
}

/// Split into keys `< key` and keys `>= key`
fn split(link: Link, key: &Key) -> (Link, Link) {
    match link {
        None => (None, None),
        Some(mut node) => {
            if node.key < *key {
                let (left, right) = split(node.right.take(), key);
                node.right = left;
                node.update();
                (Some(node), right)
            } else {
                let (left, right) = split(node.left.take(), key);
                node.left = right;
                node.update();
                (left, Some(node))
            }
        }
    }
}

/// Join two treaps where every key of `left` precedes every key of `right`
fn merge(left: Link, right: Link) -> Link {
    match (left, right) {
        (None, right) => right,
        (left, None) => left,
        (Some(mut left), Some(mut right)) => {
            if left.priority > right.priority {
                left.right = merge(left.right.take(), Some(right));
                left.update();
                Some(left)
            } else {
                right.left = merge(Some(left), right.left.take());
                right.update();
                Some(right)
            }
        }
    }
}

fn remove_key(link: &mut Link, key: &Key) -> bool {
    let Some(node) = link else {
        return false;
    };
    let removed = match key.cmp(&node.key) {
        Ordering::Less => remove_key(&mut node.left, key),
        Ordering::Greater => remove_key(&mut node.right, key),
        Ordering::Equal => {
            let left = node.left.take();
            let right = node.right.take();
            *link = merge(left, right);
            return true;
        }
    };
    if removed {
        node.size -= 1;
    }
    removed
}

fn count_before(mut link: &Link, key: &Key) -> usize {
    let mut count = 0;
    while let Some(node) = link {
        match key.cmp(&node.key) {
            Ordering::Less => link = &node.left,
            Ordering::Equal => return count + size(&node.left),
            Ordering::Greater => {
                count += size(&node.left) + 1;
                link = &node.right;
            }
        }
    }
    count
}

fn collect_range(link: &Link, skip: &mut usize, take: usize, out: &mut Vec<Key>) {
    let Some(node) = link else {
        return;
    };
    if out.len() >= take {
        return;
    }

    let left_size = size(&node.left);
    if *skip >= left_size {
        *skip -= left_size;
    } else {
        collect_range(&node.left, skip, take, out);
        if out.len() >= take {
            return;
        }
    }

    if *skip > 0 {
        *skip -= 1;
    } else {
        out.push(node.key.clone());
    }

    collect_range(&node.right, skip, take, out);
}

/// Member → score set ordered by score descending
#[derive(Debug, Default)]
pub struct RankedSet {
    root: Link,
    scores: HashMap<UserId, i64>,
}

impl RankedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Insert or replace a member's score, returning the previous score
    pub fn insert(&mut self, member: UserId, score: i64) -> Option<i64> {
        let previous = self.scores.insert(member, score);
        if let Some(old) = previous {
            if old == score {
                return previous;
            }
            remove_key(&mut self.root, &Key::new(old, member));
        }

        let key = Key::new(score, member);
        let (left, right) = split(self.root.take(), &key);
        self.root = merge(merge(left, Some(Box::new(Node::new(key)))), right);
        previous
    }

    /// Remove a member, returning its score
    pub fn remove(&mut self, member: UserId) -> Option<i64> {
        let score = self.scores.remove(&member)?;
        remove_key(&mut self.root, &Key::new(score, member));
        Some(score)
    }

    pub fn score(&self, member: UserId) -> Option<i64> {
        self.scores.get(&member).copied()
    }

    /// 0-based position of a member in descending order
    pub fn rank(&self, member: UserId) -> Option<usize> {
        let score = self.score(member)?;
        Some(count_before(&self.root, &Key::new(score, member)))
    }

    /// Up to `count` entries starting at 0-based position `start`
    pub fn range(&self, start: usize, count: usize) -> Vec<(UserId, i64)> {
        let mut keys = Vec::with_capacity(count.min(self.len()));
        let mut skip = start;
        collect_range(&self.root, &mut skip, count, &mut keys);
        keys.into_iter().map(|key| (key.member, key.score)).collect()
    }

    /// Remove every entry, returning how many there were
    pub fn clear(&mut self) -> usize {
        let count = self.scores.len();
        self.root = None;
        self.scores.clear();
        count
    }
}
