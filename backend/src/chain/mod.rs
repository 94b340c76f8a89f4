//! Segment-chain engine for a single line.
//!
//! A [`Chain`] is the set of [`Segment`]s of one line. Well-formed chains are a
//! single simple directed path: every station is the source of at most one
//! segment and the target of at most one segment, with exactly one head and
//! one tail.
//!
//! Mutations never modify `self`. [`Chain::insert`] and [`Chain::remove`]
//! validate the request against the current segments and return a
//! [`ChainUpdate`] holding the replacement chain together with the exact
//! segments to delete from and insert into storage.
//!
//! ```
//! use subway_backend::chain::Chain;
//! use subway_backend::models::Station;
//!
//! let chain = Chain::default()
//!     .insert(Station::from("A"), Station::from("B"), 10)
//!     .unwrap()
//!     .chain;
//! let update = chain.insert(Station::from("A"), Station::from("D"), 4).unwrap();
//!
//! assert_eq!(update.removed.len(), 1);
//! assert_eq!(update.added.len(), 2);
//! assert_eq!(
//!     update.chain.ordered_stations().unwrap(),
//!     vec![Station::from("A"), Station::from("D"), Station::from("B")]
//! );
//! ```

pub mod error;


pub use error::{ChainError, ChainResult};

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::models::{Segment, Station};

/// The segments of one line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Chain {
    segments: Vec<Segment>,
}

/// Outcome of a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainUpdate {
    /// The chain after the mutation.
    pub chain: Chain,
    /// Segments that must be inserted into storage.
    pub added: Vec<Segment>,
    /// Segments that must be deleted from storage.
    pub removed: Vec<Segment>,
}

impl Chain {
    /// Wrap a snapshot of stored segments without checking its shape.
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Wrap a snapshot and reject it up front if it is not a single path.
    pub fn validated(segments: Vec<Segment>) -> ChainResult<Self> {
        let chain = Self::new(segments);
        chain.ordered_stations()?;
        Ok(chain)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn contains(&self, station: &Station) -> bool {
        self.segments.iter().any(|segment| segment.contains(station))
    }

    /// The station with no incoming segment.
    pub fn head(&self) -> Option<&Station> {
        self.segments
            .iter()
            .map(Segment::source)
            .find(|station| self.incoming(station).is_none())
    }

    /// The station with no outgoing segment.
    pub fn tail(&self) -> Option<&Station> {
        self.segments
            .iter()
            .map(Segment::target)
            .find(|station| self.outgoing(station).is_none())
    }

    pub fn total_distance(&self) -> u64 {
        self.segments
            .iter()
            .map(|segment| u64::from(segment.distance()))
            .sum()
    }

    fn outgoing(&self, station: &Station) -> Option<&Segment> {
        self.segments.iter().find(|segment| segment.is_source(station))
    }

    fn incoming(&self, station: &Station) -> Option<&Segment> {
        self.segments.iter().find(|segment| segment.is_target(station))
    }

    /// Attach the segment `source -> target` to the chain.
    ///
    /// Exactly one endpoint must already be on the line. When the existing
    /// endpoint is the tail (for a new downstream station) or the head (for a
    /// new upstream station) the segment is simply appended. Otherwise the
    /// segment leaving or entering the existing station is split in two, which
    /// requires `distance` to be strictly shorter than the segment being split.
    ///
    /// # Errors
    /// * [`ChainError::InvalidSegment`] - zero distance or `source == target`
    /// * [`ChainError::DuplicateSegment`] - both stations already on the line
    /// * [`ChainError::DisconnectedSegment`] - neither station on the line
    /// * [`ChainError::DistanceTooLong`] - split distance not shorter than the split segment
    pub fn insert(
        &self,
        source: Station,
        target: Station,
        distance: u32,
    ) -> ChainResult<ChainUpdate> {
        let proposed = Segment::new(source, target, distance)?;

        if self.is_empty() {
            return Ok(self.rewrite(Vec::new(), vec![proposed]));
        }

        let has_source = self.contains(proposed.source());
        let has_target = self.contains(proposed.target());
        match (has_source, has_target) {
            (true, true) => {
                return Err(ChainError::DuplicateSegment {
                    upstream: proposed.source().clone(),
                    downstream: proposed.target().clone(),
                })
            }
            (false, false) => {
                return Err(ChainError::DisconnectedSegment {
                    upstream: proposed.source().clone(),
                    downstream: proposed.target().clone(),
                })
            }
            _ => {}
        }

        if has_source {
            self.insert_downstream(proposed)
        } else {
            self.insert_upstream(proposed)
        }
    }

    /// New station goes after an existing one.
    fn insert_downstream(&self, proposed: Segment) -> ChainResult<ChainUpdate> {
        let Some(split) = self.outgoing(proposed.source()) else {
            return Ok(self.rewrite(Vec::new(), vec![proposed]));
        };
        Self::check_split(split, &proposed)?;

        let remainder = Segment::new(
            proposed.target().clone(),
            split.target().clone(),
            split.distance() - proposed.distance(),
        )?;
        Ok(self.rewrite(vec![split.clone()], vec![proposed, remainder]))
    }

    /// New station goes before an existing one.
    fn insert_upstream(&self, proposed: Segment) -> ChainResult<ChainUpdate> {
        let Some(split) = self.incoming(proposed.target()) else {
            return Ok(self.rewrite(Vec::new(), vec![proposed]));
        };
        Self::check_split(split, &proposed)?;

        let remainder = Segment::new(
            split.source().clone(),
            proposed.source().clone(),
            split.distance() - proposed.distance(),
        )?;
        Ok(self.rewrite(vec![split.clone()], vec![remainder, proposed]))
    }

    /// A split must leave a positive remainder.
    fn check_split(split: &Segment, proposed: &Segment) -> ChainResult<()> {
        if proposed.distance_at_least(split.distance()) {
            return Err(ChainError::DistanceTooLong {
                requested: proposed.distance(),
                existing: split.clone(),
            });
        }
        Ok(())
    }

    /// Take `station` off the line.
    ///
    /// An endpoint just loses its single segment; an interior station's two
    /// segments are merged into one spanning their summed distance.
    ///
    /// # Errors
    /// * [`ChainError::StationNotFound`] - the station is not on the line
    /// * [`ChainError::InvalidSegment`] - the merged distance overflows
    pub fn remove(&self, station: &Station) -> ChainResult<ChainUpdate> {
        if !self.contains(station) {
            return Err(ChainError::StationNotFound(station.clone()));
        }
        if self.segments.len() == 1 {
            return Ok(self.rewrite(self.segments.clone(), Vec::new()));
        }

        match (self.incoming(station), self.outgoing(station)) {
            (Some(inbound), Some(outbound)) => {
                let distance = inbound
                    .distance()
                    .checked_add(outbound.distance())
                    .ok_or_else(|| {
                        ChainError::InvalidSegment(format!(
                            "merged distance of {} and {} overflows",
                            inbound, outbound
                        ))
                    })?;
                let merged = Segment::new(
                    inbound.source().clone(),
                    outbound.target().clone(),
                    distance,
                )?;
                Ok(self.rewrite(vec![inbound.clone(), outbound.clone()], vec![merged]))
            }
            (Some(edge), None) | (None, Some(edge)) => {
                Ok(self.rewrite(vec![edge.clone()], Vec::new()))
            }
            (None, None) => Err(ChainError::StationNotFound(station.clone())),
        }
    }

    /// Stations from head to tail.
    ///
    /// # Errors
    /// [`ChainError::InconsistentChain`] if the segments branch, loop, or fall
    /// apart into several fragments.
    pub fn ordered_stations(&self) -> ChainResult<Vec<Station>> {
        if self.segments.is_empty() {
            return Ok(Vec::new());
        }

        let mut next: HashMap<&Station, &Station> = HashMap::with_capacity(self.segments.len());
        let mut targets: HashSet<&Station> = HashSet::with_capacity(self.segments.len());
        for segment in &self.segments {
            if next.insert(segment.source(), segment.target()).is_some() {
                return Err(ChainError::InconsistentChain(format!(
                    "{} has more than one outgoing segment",
                    segment.source()
                )));
            }
            if !targets.insert(segment.target()) {
                return Err(ChainError::InconsistentChain(format!(
                    "{} has more than one incoming segment",
                    segment.target()
                )));
            }
        }

        let mut heads = self
            .segments
            .iter()
            .map(Segment::source)
            .filter(|station| !targets.contains(station));
        let head = heads.next().ok_or_else(|| {
            ChainError::InconsistentChain("every station has an incoming segment".to_string())
        })?;
        if let Some(other) = heads.next() {
            return Err(ChainError::InconsistentChain(format!(
                "both {} and {} have no incoming segment",
                head, other
            )));
        }

        // Targets are unique, so walking from the only head cannot revisit a station.
        let mut ordered = Vec::with_capacity(self.segments.len() + 1);
        let mut current = Some(head);
        while let Some(station) = current {
            ordered.push(station.clone());
            current = next.get(station).copied();
        }

        if ordered.len() != self.segments.len() + 1 {
            return Err(ChainError::InconsistentChain(format!(
                "walk from {} reached {} of {} stations",
                head,
                ordered.len(),
                self.segments.len() + 1
            )));
        }
        Ok(ordered)
    }

    /// Build the replacement chain, splicing `added` where the first removed
    /// segment used to be.
    fn rewrite(&self, removed: Vec<Segment>, added: Vec<Segment>) -> ChainUpdate {
        let mut segments = Vec::with_capacity(self.segments.len() + added.len());
        let mut spliced = false;
        for segment in &self.segments {
            if removed.contains(segment) {
                if !spliced {
                    segments.extend(added.iter().cloned());
                    spliced = true;
                }
                continue;
            }
            segments.push(segment.clone());
        }
        if !spliced {
            segments.extend(added.iter().cloned());
        }

        ChainUpdate {
            chain: Chain::new(segments),
            added,
            removed,
        }
    }
}

impl From<Vec<Segment>> for Chain {
    fn from(segments: Vec<Segment>) -> Self {
        Chain::new(segments)
    }
}
