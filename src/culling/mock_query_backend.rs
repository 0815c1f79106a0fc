/// Mock query backend for tests and headless runs (no GPU required).
///
/// Sample counts are scripted per node id (everything fully visible by
/// default), results can be delayed by a configurable number of polls
/// to exercise the asynchronous result pipeline, and every backend call
/// is recorded in an operation log for assertions.

use std::cell::Cell;
use std::collections::VecDeque;
use glam::Vec3;
use crate::error::{Error, Result};
use crate::tree::{NodeId, Statistics};
use super::query_backend::QueryBackend;

/// Sample count reported for nodes without a scripted value.
const FULLY_VISIBLE: u32 = u32::MAX;

struct PendingQuery {
    node: NodeId,
    /// Polls of `front_result_available` left before the result is ready
    remaining_polls: Cell<u32>,
}

#[derive(Default)]
pub struct MockQueryBackend {
    sample_counts: Vec<u32>,
    latency: u32,
    queue: VecDeque<PendingQuery>,
    operations: Vec<String>,
    fail_results: bool,
}

impl MockQueryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the sample count returned for one node's queries.
    pub fn set_sample_count(&mut self, node: NodeId, samples: u32) {
        if let Some(slot) = self.sample_counts.get_mut(node as usize) {
            *slot = samples;
        }
    }

    /// Script the sample count for every node.
    pub fn set_all_sample_counts(&mut self, samples: u32) {
        self.sample_counts.fill(samples);
    }

    /// Results become available only after `polls` calls to
    /// `front_result_available`. Default 0 (immediately available).
    pub fn set_latency(&mut self, polls: u32) {
        self.latency = polls;
    }

    /// Make `query_result` fail, simulating a broken driver.
    pub fn set_fail_results(&mut self, fail: bool) {
        self.fail_results = fail;
    }

    /// Recorded backend calls, e.g. `"begin_bv 3"`, `"draw_bv"`.
    pub fn operations(&self) -> &[String] {
        &self.operations
    }

    pub fn clear_operations(&mut self) {
        self.operations.clear();
    }

    fn push_query(&mut self, node: NodeId) -> Result<()> {
        if (node as usize) >= self.sample_counts.len() {
            return Err(Error::BackendError(format!(
                "no query handle for node {} (init sized {} handles)",
                node,
                self.sample_counts.len()
            )));
        }

        self.queue.push_back(PendingQuery {
            node,
            remaining_polls: Cell::new(self.latency),
        });
        Ok(())
    }
}

impl QueryBackend for MockQueryBackend {
    fn init(&mut self, stats: &Statistics) -> Result<()> {
        self.sample_counts = vec![FULLY_VISIBLE; stats.node_count as usize];
        self.queue.clear();
        self.operations.clear();
        Ok(())
    }

    fn begin_bounding_volume_query(&mut self, node: NodeId) -> Result<()> {
        self.operations.push(format!("begin_bv {}", node));
        self.push_query(node)
    }

    fn end_bounding_volume_query(&mut self) {
        self.operations.push("end_bv".to_string());
    }

    fn begin_geometry_query(&mut self, node: NodeId) -> Result<()> {
        self.operations.push(format!("begin_geom {}", node));
        self.push_query(node)
    }

    fn end_geometry_query(&mut self) {
        self.operations.push("end_geom".to_string());
    }

    fn draw_bounding_volume(&mut self, _corners: &[Vec3; 8]) {
        self.operations.push("draw_bv".to_string());
    }

    fn done(&self) -> bool {
        self.queue.is_empty()
    }

    fn pop_front_node(&mut self) -> Option<NodeId> {
        self.queue.pop_front().map(|query| query.node)
    }

    fn front_result_available(&self) -> bool {
        match self.queue.front() {
            Some(query) => {
                let remaining = query.remaining_polls.get();
                if remaining == 0 {
                    true
                } else {
                    query.remaining_polls.set(remaining - 1);
                    false
                }
            }
            None => false,
        }
    }

    fn query_result(&mut self, node: NodeId) -> Result<u32> {
        if self.fail_results {
            return Err(Error::BackendError(format!(
                "query result for node {} unavailable",
                node
            )));
        }

        match self.sample_counts.get(node as usize) {
            Some(&samples) => Ok(samples),
            None => Err(Error::BackendError(format!(
                "no query handle for node {}",
                node
            ))),
        }
    }
}
