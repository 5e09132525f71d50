//! Diff ingestion.
//!
//! [`CasDiff`] walks every party's document states layer by layer, maps each
//! record to its positions and folds it into the configuration set at that
//! position. Structural equality decides whether a record joins an existing
//! configuration or opens a new one.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::rc::Rc;

use casdiff_core_types::{DiffRunId, PartyId};

use crate::cas::{Addr, DocumentState, FeatureValue, Span};
use crate::diff::adapter::{DiffAdapter, LinkFeatureDecl};
use crate::diff::configuration::{Aid, Configuration, ConfigurationSet};
use crate::diff::position::{LinkCompareBehavior, LinkKey, Position};
use crate::diff::result::DiffResult;
use crate::errors::{CasDiffError, Result};
use crate::schema::{build_adapters, DiffConfig};
use crate::{log_op_end, log_op_error, log_op_start};

/// Document states per party, one slot per document index
///
/// An empty slot means the party never worked on that document.
pub type DocumentMap = BTreeMap<PartyId, Vec<Option<DocumentState>>>;

static NULL_VALUE: FeatureValue = FeatureValue::Null;

/// Run-wide knobs of one diff invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffOptions {
    pub behavior: LinkCompareBehavior,
    /// Compare link features as part of the host record's label
    pub recurse_into_link_features: bool,
    /// Only records lying within this range take part
    pub scope: Option<Span>,
}

impl DiffOptions {
    pub fn new(behavior: LinkCompareBehavior) -> Self {
        Self {
            behavior,
            ..Self::default()
        }
    }

    pub fn with_scope(mut self, begin: usize, end: usize) -> Self {
        self.scope = Some(Span::new(begin, end));
        self
    }

    pub fn with_recursion(mut self, recurse_into_link_features: bool) -> Self {
        self.recurse_into_link_features = recurse_into_link_features;
        self
    }
}

/// Engine state of one diff run
///
/// Borrows the document states for the duration of ingestion only; the
/// [`DiffResult`] it produces holds addresses, not records.
pub struct CasDiff<'a> {
    run_id: DiffRunId,
    documents: &'a DocumentMap,
    adapters: BTreeMap<String, DiffAdapter>,
    options: DiffOptions,
    sets: BTreeMap<Position, ConfigurationSet>,
    label_cache: HashMap<String, Rc<[String]>>,
    /// Record pairs currently being compared; a revisit is assumed equal
    in_progress: HashSet<ComparedPair>,
}

/// `(document, address)` of both sides of one structural comparison
type ComparedPair = (usize, Addr, usize, Addr);

/// Compute the diff of `documents` over the layers of `adapters`
///
/// # Errors
///
/// - `DuplicateAdapter` if two adapters cover the same layer
/// - `InvalidScope` if `scope` begins after it ends
pub fn compute_diff<I>(
    adapters: I,
    behavior: LinkCompareBehavior,
    documents: &DocumentMap,
    scope: Option<Span>,
) -> Result<DiffResult>
where
    I: IntoIterator<Item = DiffAdapter>,
{
    let options = DiffOptions {
        behavior,
        recurse_into_link_features: false,
        scope,
    };
    CasDiff::compute(adapters, options, documents).map(CasDiff::into_result)
}

/// Compute the diff of one document per party
///
/// Takes the documents by value and moves each into a one-slot
/// [`DocumentMap`]; the returned result holds addresses only.
///
/// # Errors
///
/// Same as [`compute_diff`].
pub fn compute_diff_single<I>(
    adapters: I,
    behavior: LinkCompareBehavior,
    documents: BTreeMap<PartyId, DocumentState>,
    scope: Option<Span>,
) -> Result<DiffResult>
where
    I: IntoIterator<Item = DiffAdapter>,
{
    let wrapped: DocumentMap = documents
        .into_iter()
        .map(|(party, doc)| (party, vec![Some(doc)]))
        .collect();
    compute_diff(adapters, behavior, &wrapped, scope)
}

/// Compute the diff with adapters and options taken from a [`DiffConfig`]
///
/// # Errors
///
/// Configuration errors from building the adapters, plus those of
/// [`compute_diff`].
pub fn compute_diff_with_config(
    config: &DiffConfig,
    documents: &DocumentMap,
    scope: Option<Span>,
) -> Result<DiffResult> {
    let adapters = build_adapters(&config.layers)?;
    let options = DiffOptions {
        behavior: config.link_compare_behavior,
        recurse_into_link_features: config.recurse_into_link_features,
        scope,
    };
    CasDiff::compute(adapters, options, documents).map(CasDiff::into_result)
}

impl<'a> CasDiff<'a> {
    /// Run ingestion over all parties and documents
    ///
    /// # Errors
    ///
    /// - `DuplicateAdapter` if two adapters cover the same layer
    /// - `InvalidScope` if the scope begins after it ends
    pub fn compute<I>(adapters: I, options: DiffOptions, documents: &'a DocumentMap) -> Result<Self>
    where
        I: IntoIterator<Item = DiffAdapter>,
    {
        let run_id = DiffRunId::new();
        log_op_start!(
            "compute_diff",
            run_id = %run_id,
            party_count = documents.len(),
            behavior = %options.behavior
        );
        let start = std::time::Instant::now();

        let diff = Self::compute_impl(run_id.clone(), adapters, options, documents).map_err(|e| {
            log_op_error!(
                "compute_diff",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                run_id = %run_id
            );
            e
        })?;

        log_op_end!(
            "compute_diff",
            duration_ms = start.elapsed().as_millis() as u64,
            run_id = %run_id,
            position_count = diff.sets.len()
        );

        Ok(diff)
    }

    fn compute_impl<I>(
        run_id: DiffRunId,
        adapters: I,
        options: DiffOptions,
        documents: &'a DocumentMap,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = DiffAdapter>,
    {
        if let Some(scope) = options.scope {
            if scope.begin > scope.end {
                return Err(CasDiffError::InvalidScope {
                    begin: scope.begin,
                    end: scope.end,
                });
            }
        }

        let mut registered = BTreeMap::new();
        for adapter in adapters {
            let layer = adapter.layer().to_string();
            if registered.contains_key(&layer) {
                return Err(CasDiffError::DuplicateAdapter { layer });
            }
            registered.insert(layer, adapter);
        }

        let mut diff = CasDiff {
            run_id,
            documents,
            adapters: registered,
            options,
            sets: BTreeMap::new(),
            label_cache: HashMap::new(),
            in_progress: HashSet::new(),
        };

        let no_documents = documents
            .values()
            .next()
            .map_or(true, |slots| slots.is_empty());
        if no_documents {
            tracing::debug!(run_id = %diff.run_id, "No document states to compare");
            return Ok(diff);
        }

        check_consistency(documents);

        let layers: Vec<String> = diff.adapters.keys().cloned().collect();
        for (party, slots) in documents {
            for (doc_index, slot) in slots.iter().enumerate() {
                let Some(doc) = slot else {
                    tracing::debug!(
                        party = %party,
                        doc_index,
                        "Party has no document state at this index"
                    );
                    continue;
                };
                for layer in &layers {
                    diff.add_layer(party, doc_index, doc, layer);
                }
            }
        }

        Ok(diff)
    }

    pub fn run_id(&self) -> &DiffRunId {
        &self.run_id
    }

    /// Number of positions seen so far
    pub fn position_count(&self) -> usize {
        self.sets.len()
    }

    /// Finish the run, detaching the result from the document states
    pub fn into_result(self) -> DiffResult {
        let parties: BTreeSet<PartyId> = self.documents.keys().cloned().collect();
        DiffResult::new(self.sets, parties)
    }

    fn add_layer(&mut self, party: &PartyId, doc_index: usize, doc: &'a DocumentState, layer: &str) {
        let records: Vec<Addr> = match self.options.scope {
            Some(scope) => doc.select_covered(layer, scope.begin, scope.end),
            None => doc.select(layer),
        }
        .into_iter()
        .map(|(addr, _)| addr)
        .collect();

        if records.is_empty() {
            tracing::debug!(party = %party, doc_index, layer, "No annotations on layer");
            return;
        }

        let before = self.sets.len();
        for addr in &records {
            for position in self.positions_of(doc_index, doc, *addr, layer) {
                let mut set = self
                    .sets
                    .remove(&position)
                    .unwrap_or_else(|| ConfigurationSet::new(position.clone()));
                self.add_configuration(&mut set, party, doc_index, doc, *addr);
                self.sets.insert(position, set);
            }
        }

        tracing::debug!(
            party = %party,
            doc_index,
            layer,
            record_count = records.len(),
            positions_before = before,
            positions_after = self.sets.len(),
            "Ingested layer"
        );
    }

    fn positions_of(
        &self,
        doc_index: usize,
        doc: &DocumentState,
        addr: Addr,
        layer: &str,
    ) -> Vec<Position> {
        let Some(adapter) = self.adapters.get(layer) else {
            return Vec::new();
        };
        let Some(primary) = adapter.position(doc_index, doc, addr) else {
            tracing::warn!(
                layer,
                doc_index,
                addr = addr.index(),
                "Record has no resolvable position; skipping"
            );
            return Vec::new();
        };
        let mut positions = adapter.sub_positions(&primary, doc, addr, self.options.behavior);
        positions.insert(0, primary);
        positions
    }

    fn add_configuration(
        &mut self,
        set: &mut ConfigurationSet,
        party: &PartyId,
        doc_index: usize,
        doc: &'a DocumentState,
        addr: Addr,
    ) {
        match set.position().link().cloned() {
            None => {
                let found = self.find_equal_configuration(set, doc, addr);
                let cfg = configuration_at(set, found);
                cfg.add(party, Aid::record(doc_index, addr));
                set.record_party(party);
            }
            Some(link) => {
                let Some(decl) = self
                    .adapters
                    .get(set.position().layer())
                    .and_then(|a| a.link_feature(&link.feature))
                    .cloned()
                else {
                    return;
                };
                let Some(slots) = doc
                    .get(addr)
                    .and_then(|fs| fs.feature(&decl.name))
                    .and_then(FeatureValue::as_array)
                else {
                    return;
                };

                for (index, element) in slots.iter().enumerate() {
                    if !decl.slot_matches(doc, element, &link.key) {
                        continue;
                    }
                    let found = self.find_equal_slot(set, &decl, &link.key, doc, element);
                    let cfg = configuration_at(set, found);
                    cfg.add(party, Aid::slot(doc_index, addr, decl.name.clone(), index));
                }
                set.record_party(party);
            }
        }
    }

    fn find_equal_configuration(
        &mut self,
        set: &ConfigurationSet,
        doc: &'a DocumentState,
        addr: Addr,
    ) -> Option<usize> {
        for (i, cfg) in set.configurations().iter().enumerate() {
            let Some((rep_doc, rep_aid)) = self.representative(cfg) else {
                continue;
            };
            if self.fs_equal(rep_doc, rep_aid.addr, doc, addr) {
                return Some(i);
            }
        }
        None
    }

    fn find_equal_slot(
        &mut self,
        set: &ConfigurationSet,
        decl: &LinkFeatureDecl,
        key: &LinkKey,
        doc: &'a DocumentState,
        element: &FeatureValue,
    ) -> Option<usize> {
        for (i, cfg) in set.configurations().iter().enumerate() {
            let Some((rep_doc, rep_aid)) = self.representative(cfg) else {
                continue;
            };
            let Some(rep_element) = slot_element(rep_doc, &rep_aid) else {
                continue;
            };
            let same = match key {
                // Keyed by role: compare where the slots point
                LinkKey::Role { .. } => {
                    match (decl.slot_target(rep_doc, rep_element), decl.slot_target(doc, element)) {
                        (Some(a), Some(b)) => self.annotation_location_equal(rep_doc, a, doc, b),
                        _ => false,
                    }
                }
                // Keyed by target: compare roles
                LinkKey::Target { .. } => {
                    match (decl.resolve_slot(rep_doc, rep_element), decl.resolve_slot(doc, element)) {
                        (Some((a, _)), Some((b, _))) => a == b,
                        _ => false,
                    }
                }
            };
            if same {
                return Some(i);
            }
        }
        None
    }

    fn representative(&self, cfg: &Configuration) -> Option<(&'a DocumentState, Aid)> {
        let (party, aid) = cfg.representative()?;
        let doc = self.document(party.as_str(), aid.doc_index)?;
        Some((doc, aid.clone()))
    }

    fn document(&self, party: &str, doc_index: usize) -> Option<&'a DocumentState> {
        let documents: &'a DocumentMap = self.documents;
        documents.get(party)?.get(doc_index)?.as_ref()
    }

    /// Adapter for `layer`, registering an unlabelled span adapter for layers
    /// nobody declared
    fn adapter_for(&mut self, layer: &str) -> &DiffAdapter {
        if !self.adapters.contains_key(layer) {
            tracing::warn!(
                layer,
                "No diff adapter for layer; treating as span layer without label features"
            );
        }
        self.adapters
            .entry(layer.to_string())
            .or_insert_with(|| DiffAdapter::span(layer, Vec::<String>::new()))
    }

    /// Sorted label features of `type_name`, link features excluded unless
    /// recursion into them is enabled
    fn label_features(&mut self, type_name: &str) -> Rc<[String]> {
        if let Some(cached) = self.label_cache.get(type_name) {
            return Rc::clone(cached);
        }

        let recurse = self.options.recurse_into_link_features;
        let adapter = self.adapter_for(type_name);
        let mut labels: Vec<String> = adapter
            .label_features()
            .iter()
            .filter(|name| recurse || adapter.link_feature(name).is_none())
            .cloned()
            .collect();
        labels.sort();
        labels.dedup();

        let labels: Rc<[String]> = labels.into();
        self.label_cache
            .insert(type_name.to_string(), Rc::clone(&labels));
        labels
    }

    /// Structural equality of two records, possibly from different documents
    fn fs_equal(
        &mut self,
        doc_a: &'a DocumentState,
        a: Addr,
        doc_b: &'a DocumentState,
        b: Addr,
    ) -> bool {
        if std::ptr::eq(doc_a, doc_b) && a == b {
            return true;
        }

        // Cycles through plain structures end at the first revisited pair
        let pair: ComparedPair = (doc_key(doc_a), a, doc_key(doc_b), b);
        if !self.in_progress.insert(pair) {
            return true;
        }
        let equal = self.fs_equal_features(doc_a, a, doc_b, b);
        self.in_progress.remove(&pair);
        equal
    }

    fn fs_equal_features(
        &mut self,
        doc_a: &'a DocumentState,
        a: Addr,
        doc_b: &'a DocumentState,
        b: Addr,
    ) -> bool {
        let (Some(fa), Some(fb)) = (doc_a.get(a), doc_b.get(b)) else {
            return false;
        };
        if fa.type_name != fb.type_name {
            return false;
        }

        let features: Rc<[String]> = if fa.is_annotation() || self.adapters.contains_key(&fa.type_name)
        {
            self.label_features(&fa.type_name)
        } else {
            tracing::debug!(
                type_name = %fa.type_name,
                "No diff adapter for structure type; comparing all features"
            );
            let names: BTreeSet<&str> = fa.feature_names().chain(fb.feature_names()).collect();
            names.into_iter().map(str::to_string).collect()
        };

        for name in features.iter() {
            let va = fa.feature(name).unwrap_or(&NULL_VALUE);
            let vb = fb.feature(name).unwrap_or(&NULL_VALUE);
            if !self.values_equal(doc_a, va, doc_b, vb) {
                return false;
            }
        }
        true
    }

    fn values_equal(
        &mut self,
        doc_a: &'a DocumentState,
        va: &FeatureValue,
        doc_b: &'a DocumentState,
        vb: &FeatureValue,
    ) -> bool {
        match (va, vb) {
            (FeatureValue::Ref(a), FeatureValue::Ref(b)) => {
                let (Some(fa), Some(fb)) = (doc_a.get(*a), doc_b.get(*b)) else {
                    return false;
                };
                match (fa.is_annotation(), fb.is_annotation()) {
                    // Annotation-valued: location only, no deeper recursion
                    (true, true) => self.annotation_location_equal(doc_a, *a, doc_b, *b),
                    (false, false) => self.fs_equal(doc_a, *a, doc_b, *b),
                    _ => false,
                }
            }
            (FeatureValue::Array(xs), FeatureValue::Array(ys)) => {
                xs.len() == ys.len()
                    && xs
                        .iter()
                        .zip(ys)
                        .all(|(x, y)| self.values_equal(doc_a, x, doc_b, y))
            }
            _ if std::mem::discriminant(va) != std::mem::discriminant(vb) => {
                tracing::trace!(
                    left = va.kind_name(),
                    right = vb.kind_name(),
                    "Feature value kinds differ"
                );
                false
            }
            _ => va == vb,
        }
    }

    fn annotation_location_equal(
        &mut self,
        doc_a: &DocumentState,
        a: Addr,
        doc_b: &DocumentState,
        b: Addr,
    ) -> bool {
        let (Some(fa), Some(fb)) = (doc_a.get(a), doc_b.get(b)) else {
            return false;
        };
        if fa.type_name != fb.type_name {
            return false;
        }
        let adapter = self.adapter_for(&fa.type_name);
        match (adapter.position(0, doc_a, a), adapter.position(0, doc_b, b)) {
            (Some(pa), Some(pb)) => pa == pb,
            _ => false,
        }
    }
}

fn doc_key(doc: &DocumentState) -> usize {
    doc as *const DocumentState as usize
}

fn configuration_at(set: &mut ConfigurationSet, found: Option<usize>) -> &mut Configuration {
    let position = set.position().clone();
    let configurations = set.configurations_mut();
    let index = match found {
        Some(index) => index,
        None => {
            configurations.push(Configuration::new(position));
            configurations.len() - 1
        }
    };
    &mut configurations[index]
}

fn slot_element<'d>(doc: &'d DocumentState, aid: &Aid) -> Option<&'d FeatureValue> {
    let slot = aid.slot.as_ref()?;
    doc.get(aid.addr)?
        .feature(&slot.feature)?
        .as_array()?
        .get(slot.index)
}

/// All parties must hold the same number of documents with identical text
/// per index. Only checked in debug builds.
fn check_consistency(documents: &DocumentMap) {
    if !cfg!(debug_assertions) {
        return;
    }
    let mut parties = documents.iter();
    let Some((first_party, first_slots)) = parties.next() else {
        return;
    };
    for (party, slots) in parties {
        assert_eq!(
            first_slots.len(),
            slots.len(),
            "Parties {} and {} hold different numbers of documents",
            first_party,
            party
        );
    }

    for doc_index in 0..first_slots.len() {
        let mut texts = documents
            .values()
            .filter_map(|slots| slots.get(doc_index).and_then(Option::as_ref))
            .map(DocumentState::text);
        if let Some(expected) = texts.next() {
            for text in texts {
                assert_eq!(
                    expected, text,
                    "Document {} has different text across parties",
                    doc_index
                );
            }
        }
    }
}
