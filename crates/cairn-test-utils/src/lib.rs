//! Test utilities and mock types for Cairn development.
//!
//! Provides mock implementations of the core traits ([`Feature`],
//! [`PartnerProbe`], [`Verifier`]) plus the [`env`] envelope helper used
//! throughout the workspace's tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use cairn_core::{Envelope, Feature, FeatureId, PendingRecord, TableSlot};
use cairn_verifier::{PartnerProbe, PartnerSet, RowVerdict, Verifier, VerifierError};

/// Build an envelope, panicking on malformed input.
///
/// Test-only convenience; production code goes through
/// [`Envelope::new`] and handles the error.
pub fn env(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Envelope {
    Envelope::new(x_min, y_min, x_max, y_max).unwrap()
}

/// Mock implementation of [`Feature`].
///
/// Carries an id and a fixed extent. Construct with
/// [`new`](MockFeature::new) for a plain re-fetchable row, or with
/// [`retained`](MockFeature::retained) for a virtual row that exposes
/// the identity-caching capability (its [`Feature::retained_copy`]
/// returns a clone).
#[derive(Clone, Debug)]
pub struct MockFeature {
    id: FeatureId,
    extent: Envelope,
    retainable: bool,
}

impl MockFeature {
    /// A plain feature backed by re-fetchable storage.
    pub fn new(id: u64, extent: Envelope) -> Self {
        Self {
            id: FeatureId(id),
            extent,
            retainable: false,
        }
    }

    /// A virtual feature whose source cannot re-fetch by id.
    pub fn retained(id: u64, extent: Envelope) -> Self {
        Self {
            id: FeatureId(id),
            extent,
            retainable: true,
        }
    }
}

impl Feature for MockFeature {
    fn feature_id(&self) -> FeatureId {
        self.id
    }

    fn extent(&self) -> Envelope {
        self.extent
    }

    fn retained_copy(&self) -> Option<Box<dyn Feature>> {
        if self.retainable {
            Some(Box::new(self.clone()))
        } else {
            None
        }
    }
}

/// Minimal pending record: identity plus captured extent, no payload.
///
/// The record type used by [`RecordingVerifier`]; also handy for tests
/// that drive the cache directly.
#[derive(Clone, Debug, PartialEq)]
pub struct BasicRecord {
    pub id: FeatureId,
    pub extent: Envelope,
}

impl BasicRecord {
    /// Capture a feature's identity and extent.
    pub fn of(feature: &dyn Feature) -> Self {
        Self {
            id: feature.feature_id(),
            extent: feature.extent(),
        }
    }
}

impl PendingRecord for BasicRecord {
    fn feature_id(&self) -> FeatureId {
        self.id
    }

    fn extent(&self) -> &Envelope {
        &self.extent
    }
}

/// Mock implementation of [`PartnerProbe`] with canned answers.
///
/// Pre-populate with [`set_partners`](StaticProbe::set_partners); any
/// unconfigured `(slot, id)` pair has no visible partners. The distance
/// argument is ignored — tests script visibility directly.
///
/// Clones share state: keep one handle to grow visibility between
/// tiles while the rule under test holds another, the way a real
/// geometry index grows as tiles load.
#[derive(Clone, Default)]
pub struct StaticProbe {
    partners: Rc<RefCell<HashMap<(TableSlot, FeatureId), Vec<FeatureId>>>>,
}

impl StaticProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the partners visible for `(slot, id)`.
    pub fn set_partners(&self, slot: TableSlot, id: u64, partners: &[u64]) {
        self.partners.borrow_mut().insert(
            (slot, FeatureId(id)),
            partners.iter().map(|&p| FeatureId(p)).collect(),
        );
    }
}

impl PartnerProbe for StaticProbe {
    fn partners_within(
        &self,
        slot: TableSlot,
        feature: &dyn Feature,
        _distance: f64,
    ) -> PartnerSet {
        self.partners
            .borrow()
            .get(&(slot, feature.feature_id()))
            .map(|v| v.iter().copied().collect())
            .unwrap_or_default()
    }
}

/// Mock implementation of [`Verifier`] with scripted verdicts.
///
/// Every row passes unless marked inconclusive with
/// [`mark_inconclusive`](RecordingVerifier::mark_inconclusive). Each
/// `report` call is recorded in [`reports`](RecordingVerifier::reports)
/// for assertions, and counts one issue per record.
#[derive(Default)]
pub struct RecordingVerifier {
    inconclusive: HashMap<TableSlot, Vec<FeatureId>>,
    /// Every `report` invocation: the slot and the resolved ids, in order.
    pub reports: Vec<(TableSlot, Vec<FeatureId>)>,
}

impl RecordingVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script `(slot, id)` to evaluate as inconclusive.
    pub fn mark_inconclusive(&mut self, slot: TableSlot, id: u64) {
        self.inconclusive
            .entry(slot)
            .or_default()
            .push(FeatureId(id));
    }

    /// Remove the inconclusive mark, so the next evaluation passes.
    pub fn mark_pass(&mut self, slot: TableSlot, id: u64) {
        if let Some(ids) = self.inconclusive.get_mut(&slot) {
            ids.retain(|&i| i != FeatureId(id));
        }
    }

    /// All ids reported so far, flattened in report order.
    pub fn reported_ids(&self) -> Vec<(TableSlot, FeatureId)> {
        self.reports
            .iter()
            .flat_map(|(slot, ids)| ids.iter().map(move |&id| (*slot, id)))
            .collect()
    }
}

impl Verifier for RecordingVerifier {
    type Record = BasicRecord;

    fn name(&self) -> &str {
        "RecordingVerifier"
    }

    fn evaluate(
        &mut self,
        slot: TableSlot,
        feature: &dyn Feature,
    ) -> Result<RowVerdict, VerifierError> {
        let inconclusive = self
            .inconclusive
            .get(&slot)
            .is_some_and(|ids| ids.contains(&feature.feature_id()));
        if inconclusive {
            Ok(RowVerdict::Inconclusive)
        } else {
            Ok(RowVerdict::Pass)
        }
    }

    fn make_record(&self, _slot: TableSlot, feature: &dyn Feature) -> BasicRecord {
        BasicRecord::of(feature)
    }

    fn report(&mut self, slot: TableSlot, records: &[BasicRecord]) -> usize {
        self.reports
            .push((slot, records.iter().map(|r| r.id).collect()));
        records.len()
    }
}
