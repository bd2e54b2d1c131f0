use crate::consist::car::TrainCar;
use crate::consist::load::ProductLoad;
use crate::error::{ConsistError, Result};
use std::fmt;

type NodeId = usize;

/// Arena slot linking one car to its neighbors. Links are slot handles rather
/// than pointers, so the empty states stay explicit `Option`s.
struct Node {
    car: TrainCar,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

/// Everything a single car contributes to the train-wide totals.
struct CarTotals {
    length: f64,
    weight: f64,
    value: f64,
    dangerous: bool,
}

impl CarTotals {
    fn of(car: &TrainCar) -> Self {
        let (load_weight, value, dangerous) = match car.load() {
            Some(load) => (load.weight(), load.value(), load.is_dangerous()),
            None => (0.0, 0.0, false),
        };
        CarTotals {
            length: car.length(),
            weight: car.weight() + load_weight,
            value,
            dangerous,
        }
    }
}

/// Outcome of a cursor step. Stepping past either end of the train is an
/// ordinary no-op, not an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CursorMove {
    Moved,
    AtEnd,
    Empty,
}

/// One manifest row: a car's position and data, plus whether the cursor
/// currently rests on it. Rendering is entirely the caller's business.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestEntry {
    pub position: usize,
    pub length: f64,
    pub weight: f64,
    pub load: Option<ProductLoad>,
    pub at_cursor: bool,
}

/// Aggregated result of a product search across the whole train.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSummary {
    pub name: String,
    pub cars: usize,
    pub weight: f64,
    pub value: f64,
    pub dangerous: bool,
}

/// An ordered consist of cars with a movable cursor. The doubly linked chain
/// lives in a slot arena; freed slots are recycled through a free list. All
/// train-wide totals are maintained incrementally and must match a
/// from-scratch recomputation after every operation.
#[derive(Default)]
pub struct Train {
    nodes: Vec<Option<Node>>,
    free: Vec<NodeId>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    cursor: Option<NodeId>,
    size: usize,
    total_length: f64,
    total_weight: f64,
    total_value: f64,
    dangerous_cars: usize,
}

impl Train {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Total length of the consist in meters.
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    /// Total weight in tons, car tares and loads combined.
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn total_value(&self) -> f64 {
        self.total_value
    }

    pub fn dangerous_cars(&self) -> usize {
        self.dangerous_cars
    }

    pub fn is_dangerous(&self) -> bool {
        self.dangerous_cars > 0
    }

    /// Walks the cars head to tail.
    pub fn cars(&self) -> impl Iterator<Item = &TrainCar> {
        self.node_ids().map(|id| &self.node(id).car)
    }

    /// Inserts `car` directly after the cursor and moves the cursor onto it.
    /// On an empty train the car becomes both head and tail; after the tail it
    /// becomes the new tail. The relative order of existing cars is preserved.
    pub fn insert_after_cursor(&mut self, car: TrainCar) -> Result<()> {
        check_dimensions(&car)?;
        let totals = CarTotals::of(&car);
        let id = self.alloc(car);
        match self.cursor {
            None => {
                self.head = Some(id);
                self.tail = Some(id);
            }
            Some(cursor) => match self.node(cursor).next {
                None => {
                    self.node_mut(cursor).next = Some(id);
                    self.node_mut(id).prev = Some(cursor);
                    self.tail = Some(id);
                }
                Some(next) => {
                    self.node_mut(id).prev = Some(cursor);
                    self.node_mut(id).next = Some(next);
                    self.node_mut(next).prev = Some(id);
                    self.node_mut(cursor).next = Some(id);
                }
            },
        }
        self.cursor = Some(id);
        self.size += 1;
        self.credit(&totals);
        Ok(())
    }

    /// Unlinks the car under the cursor and returns it. The cursor moves to
    /// the successor, falling back to the predecessor at the tail; removing
    /// the last car leaves the train empty.
    pub fn remove_cursor(&mut self) -> Result<TrainCar> {
        let cursor = self.cursor.ok_or_else(empty_train)?;
        Ok(self.unlink(cursor))
    }

    pub fn cursor_forward(&mut self) -> CursorMove {
        match self.cursor {
            None => CursorMove::Empty,
            Some(cursor) => match self.node(cursor).next {
                Some(next) => {
                    self.cursor = Some(next);
                    CursorMove::Moved
                }
                None => CursorMove::AtEnd,
            },
        }
    }

    pub fn cursor_backward(&mut self) -> CursorMove {
        match self.cursor {
            None => CursorMove::Empty,
            Some(cursor) => match self.node(cursor).prev {
                Some(prev) => {
                    self.cursor = Some(prev);
                    CursorMove::Moved
                }
                None => CursorMove::AtEnd,
            },
        }
    }

    pub fn cursor_car(&self) -> Result<&TrainCar> {
        let cursor = self.cursor.ok_or_else(empty_train)?;
        Ok(&self.node(cursor).car)
    }

    /// Replaces the car under the cursor, returning the one it displaced.
    /// The incoming car is validated like an inserted one and every total is
    /// adjusted by the difference.
    pub fn set_cursor_car(&mut self, car: TrainCar) -> Result<TrainCar> {
        check_dimensions(&car)?;
        let cursor = self.cursor.ok_or_else(empty_train)?;
        self.credit(&CarTotals::of(&car));
        let old = std::mem::replace(&mut self.node_mut(cursor).car, car);
        self.debit(&CarTotals::of(&old));
        Ok(old)
    }

    /// Replaces the load slot of the car under the cursor, keeping the totals
    /// exact, and returns the displaced load if there was one.
    pub fn set_cursor_load(&mut self, load: Option<ProductLoad>) -> Result<Option<ProductLoad>> {
        let cursor = self.cursor.ok_or_else(empty_train)?;
        let before = CarTotals::of(&self.node(cursor).car);
        let displaced = self.node_mut(cursor).car.set_load(load);
        let after = CarTotals::of(&self.node(cursor).car);
        self.debit(&before);
        self.credit(&after);
        Ok(displaced)
    }

    /// Removes every car carrying a dangerous load, preserving the order of
    /// the survivors, and returns the removed cars. The cursor is re-seated at
    /// the head when anything was removed and left alone otherwise.
    pub fn remove_dangerous_cars(&mut self) -> Vec<TrainCar> {
        let dangerous: Vec<NodeId> = self
            .node_ids()
            .filter(|&id| self.node(id).car.load().is_some_and(ProductLoad::is_dangerous))
            .collect();
        if dangerous.is_empty() {
            return Vec::new();
        }
        let removed = dangerous.into_iter().map(|id| self.unlink(id)).collect();
        self.cursor = self.head;
        removed
    }

    /// Case-insensitive exact-name search over the loads, aggregating matched
    /// weight, value, and danger across all matching cars. Read-only.
    pub fn find_product(&self, name: &str) -> Result<ProductSummary> {
        let mut summary = ProductSummary {
            name: name.to_string(),
            cars: 0,
            weight: 0.0,
            value: 0.0,
            dangerous: false,
        };
        for load in self.cars().filter_map(TrainCar::load) {
            if load.name().eq_ignore_ascii_case(name) {
                summary.cars += 1;
                summary.weight += load.weight();
                summary.value += load.value();
                summary.dangerous |= load.is_dangerous();
            }
        }
        if summary.cars == 0 {
            return Err(ConsistError::not_found(format!(
                "No product named \"{name}\" was found on the train!"
            )));
        }
        Ok(summary)
    }

    /// One entry per car, head to tail, with 1-based positions. Read-only.
    pub fn manifest(&self) -> Vec<ManifestEntry> {
        self.node_ids()
            .enumerate()
            .map(|(index, id)| {
                let node = self.node(id);
                ManifestEntry {
                    position: index + 1,
                    length: node.car.length(),
                    weight: node.car.weight(),
                    load: node.car.load().cloned(),
                    at_cursor: self.cursor == Some(id),
                }
            })
            .collect()
    }

    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id].as_ref().expect("live node")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id].as_mut().expect("live node")
    }

    fn node_ids(&self) -> NodeWalker<'_> {
        NodeWalker {
            train: self,
            next: self.head,
        }
    }

    fn alloc(&mut self, car: TrainCar) -> NodeId {
        let node = Node {
            car,
            prev: None,
            next: None,
        };
        match self.free.pop() {
            Some(id) => {
                self.nodes[id] = Some(node);
                id
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        }
    }

    /// Detaches `id` from the chain, fixing neighbors, endpoints, cursor, and
    /// totals, and recycles the slot.
    fn unlink(&mut self, id: NodeId) -> TrainCar {
        let (prev, next) = {
            let node = self.node(id);
            (node.prev, node.next)
        };
        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev = prev,
            None => self.tail = prev,
        }
        if self.cursor == Some(id) {
            self.cursor = next.or(prev);
        }

        let node = self.nodes[id].take().expect("live node");
        self.free.push(id);
        self.size -= 1;
        self.debit(&CarTotals::of(&node.car));
        node.car
    }

    fn credit(&mut self, totals: &CarTotals) {
        self.total_length += totals.length;
        self.total_weight += totals.weight;
        self.total_value += totals.value;
        if totals.dangerous {
            self.dangerous_cars += 1;
        }
    }

    fn debit(&mut self, totals: &CarTotals) {
        self.total_length -= totals.length;
        self.total_weight -= totals.weight;
        self.total_value -= totals.value;
        if totals.dangerous {
            self.dangerous_cars -= 1;
        }
    }
}

impl fmt::Display for Train {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let danger = if self.is_dangerous() { "DANGEROUS" } else { "NOT DANGEROUS" };
        write!(
            f,
            "Train: {} cars, {:.1} meters, {:.1} tons, ${:.2} value, {} with {} dangerous cars on board.",
            self.size, self.total_length, self.total_weight, self.total_value, danger, self.dangerous_cars
        )
    }
}

struct NodeWalker<'a> {
    train: &'a Train,
    next: Option<NodeId>,
}

impl Iterator for NodeWalker<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.train.node(id).next;
        Some(id)
    }
}

fn check_dimensions(car: &TrainCar) -> Result<()> {
    if car.length() > 0.0 && car.weight() > 0.0 {
        Ok(())
    } else {
        Err(ConsistError::invalid(
            "Car length and weight must be greater than 0!",
        ))
    }
}

fn empty_train() -> ConsistError {
    ConsistError::invalid("The train is currently empty!")
}
