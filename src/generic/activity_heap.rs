/*!
A max heap of variables, ordered by activity.

The heap is backed by a vector of activities indexed by variable, with a companion vector tracking where (if anywhere) each variable sits in the heap.
Activities persist when a variable leaves the heap, so a variable may be removed when assigned and re-inserted with the same activity when unassigned.

```rust
# use otter_pb::generic::activity_heap::ActivityHeap;
let mut heap = ActivityHeap::default();
heap.grow(4);
heap.bump(3, 2.0);
heap.bump(1, 1.0);
for v in 1..=4 {
    heap.insert(v);
}

assert_eq!(heap.pop_max(), Some(3));
assert_eq!(heap.pop_max(), Some(1));
assert_eq!(heap.len(), 2);
```
*/

/// A heap of variables by activity.
#[derive(Default)]
pub struct ActivityHeap {
    activity: Vec<f64>,
    position_in_heap: Vec<Option<usize>>,
    heap: Vec<usize>,
}

impl ActivityHeap {
    /// Extends the structure to index variables up to and including `max_var`.
    /// Fresh variables have zero activity and are not on the heap.
    pub fn grow(&mut self, max_var: i32) {
        let required = max_var as usize + 1;
        if self.activity.len() < required {
            self.activity.resize(required, 0.0);
            self.position_in_heap.resize(required, None);
        }
    }

    /// The number of variables on the heap.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, variable: i32) -> bool {
        self.position_in_heap[variable as usize].is_some()
    }

    pub fn activity(&self, variable: i32) -> f64 {
        self.activity[variable as usize]
    }

    /// Inserts `variable` onto the heap, if absent.
    pub fn insert(&mut self, variable: i32) {
        let index = variable as usize;
        if self.position_in_heap[index].is_none() {
            self.position_in_heap[index] = Some(self.heap.len());
            self.heap.push(index);
            self.sift_up(self.heap.len() - 1);
        }
    }

    /// Removes `variable` from the heap, if present.
    pub fn remove(&mut self, variable: i32) -> bool {
        let index = variable as usize;
        match self.position_in_heap[index] {
            None => false,
            Some(heap_index) => {
                let last = self.heap.len() - 1;
                self.swap(heap_index, last);
                self.heap.pop();
                self.position_in_heap[index] = None;
                if heap_index < self.heap.len() {
                    self.sift_down(heap_index);
                    self.sift_up(heap_index);
                }
                true
            }
        }
    }

    /// The variable with greatest activity, without removing it.
    pub fn peek_max(&self) -> Option<i32> {
        self.heap.first().map(|index| *index as i32)
    }

    /// Removes and returns the variable with greatest activity.
    pub fn pop_max(&mut self) -> Option<i32> {
        let max = self.peek_max()?;
        self.remove(max);
        Some(max)
    }

    /// Adds `amount` to the activity of `variable`, and returns the revised activity.
    pub fn bump(&mut self, variable: i32, amount: f64) -> f64 {
        let index = variable as usize;
        self.activity[index] += amount;
        if let Some(heap_index) = self.position_in_heap[index] {
            self.sift_up(heap_index);
        }
        self.activity[index]
    }

    /// Sets the activity of `variable`.
    pub fn revalue(&mut self, variable: i32, activity: f64) {
        let index = variable as usize;
        self.activity[index] = activity;
        if let Some(heap_index) = self.position_in_heap[index] {
            self.sift_down(heap_index);
            self.sift_up(heap_index);
        }
    }

    /// Multiplies every activity by `factor`.
    /// As scaling preserves order, the heap remains valid.
    pub fn scale_all(&mut self, factor: f64) {
        for activity in self.activity.iter_mut() {
            *activity *= factor;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.position_in_heap[self.heap[a]] = Some(a);
        self.position_in_heap[self.heap[b]] = Some(b);
    }

    fn value(&self, heap_index: usize) -> f64 {
        self.activity[self.heap[heap_index]]
    }

    fn sift_up(&mut self, mut heap_index: usize) {
        while heap_index > 0 {
            let parent = (heap_index - 1) / 2;
            if self.value(parent) >= self.value(heap_index) {
                break;
            }
            self.swap(parent, heap_index);
            heap_index = parent;
        }
    }

    fn sift_down(&mut self, mut heap_index: usize) {
        loop {
            let left = 2 * heap_index + 1;
            let right = left + 1;
            let mut largest = heap_index;
            if left < self.heap.len() && self.value(left) > self.value(largest) {
                largest = left;
            }
            if right < self.heap.len() && self.value(right) > self.value(largest) {
                largest = right;
            }
            if largest == heap_index {
                break;
            }
            self.swap(heap_index, largest);
            heap_index = largest;
        }
    }
}
