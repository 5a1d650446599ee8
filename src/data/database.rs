use std::collections::HashMap;

use super::filter::FilterSet;
use super::model::{ApproachId, CloseApproach, LinkedApproach, NearEarthObject, NeoId};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// NeoDatabase – linked NEOs and close approaches with lookup indices
// ---------------------------------------------------------------------------

/// All NEOs and close approaches of one load, cross-linked and indexed.
///
/// Entities live in two arenas. A close approach refers to its NEO through a
/// [`NeoId`], and each NEO lists its approaches as [`ApproachId`]s, so the
/// bidirectional links carry no ownership. The database is immutable once
/// built.
#[derive(Debug, Clone)]
pub struct NeoDatabase {
    neos: Vec<NearEarthObject>,
    approaches: Vec<CloseApproach>,
    by_designation: HashMap<String, NeoId>,
    /// Last NEO in load order wins when names collide.
    by_name: HashMap<String, NeoId>,
}

impl NeoDatabase {
    /// Link two independently loaded collections.
    ///
    /// Fails on a duplicate NEO designation or on a close approach whose
    /// designation matches no NEO; no partially linked database is returned.
    pub fn new(mut neos: Vec<NearEarthObject>, mut approaches: Vec<CloseApproach>) -> Result<Self> {
        let mut by_designation = HashMap::with_capacity(neos.len());
        let mut by_name = HashMap::new();

        for (row, neo) in neos.iter().enumerate() {
            if let Some(prev) = by_designation.insert(neo.designation.clone(), NeoId(row)) {
                return Err(Error::DuplicateDesignation {
                    designation: neo.designation.clone(),
                    first_row: prev.0,
                    second_row: row,
                });
            }
            if let Some(name) = &neo.name {
                if let Some(prev) = by_name.insert(name.clone(), NeoId(row)) {
                    log::debug!(
                        "NEO name '{name}' shared by rows {} and {row}; keeping row {row}",
                        prev.0
                    );
                }
            }
        }

        for (row, approach) in approaches.iter_mut().enumerate() {
            let id = *by_designation
                .get(&approach.designation)
                .ok_or_else(|| Error::UnknownDesignation {
                    designation: approach.designation.clone(),
                    approach_row: row,
                })?;
            approach.neo = Some(id);
            neos[id.0].approaches.push(ApproachId(row));
        }

        log::info!(
            "Linked {} close approaches to {} NEOs ({} named)",
            approaches.len(),
            neos.len(),
            by_name.len()
        );

        Ok(Self {
            neos,
            approaches,
            by_designation,
            by_name,
        })
    }

    /// Exact, case-sensitive lookup by primary designation.
    pub fn get_neo_by_designation(&self, designation: &str) -> Option<&NearEarthObject> {
        self.by_designation.get(designation).map(|id| &self.neos[id.0])
    }

    /// Exact lookup by IAU name.
    pub fn get_neo_by_name(&self, name: &str) -> Option<&NearEarthObject> {
        self.by_name.get(name).map(|id| &self.neos[id.0])
    }

    pub fn neo(&self, id: NeoId) -> Option<&NearEarthObject> {
        self.neos.get(id.0)
    }

    pub fn approach(&self, id: ApproachId) -> Option<&CloseApproach> {
        self.approaches.get(id.0)
    }

    pub fn neos(&self) -> &[NearEarthObject] {
        &self.neos
    }

    /// Close approaches in load order.
    pub fn approaches(&self) -> &[CloseApproach] {
        &self.approaches
    }

    /// Join a close approach with its NEO.
    pub fn resolve<'a>(&'a self, approach: &'a CloseApproach) -> Result<LinkedApproach<'a>> {
        approach
            .neo_id()
            .and_then(|id| self.neo(id))
            .map(|neo| LinkedApproach::new(approach, neo))
            .ok_or_else(|| Error::Unlinked(approach.designation.clone()))
    }

    /// The close approaches of `neo`, in load order.
    pub fn approaches_of<'a>(
        &'a self,
        neo: &'a NearEarthObject,
    ) -> impl Iterator<Item = LinkedApproach<'a>> + 'a {
        neo.approach_ids()
            .iter()
            .filter_map(move |id| self.approach(*id))
            .map(move |approach| LinkedApproach::new(approach, neo))
    }

    /// Every linked close approach, in load order.
    pub fn linked(&self) -> impl Iterator<Item = LinkedApproach<'_>> + '_ {
        self.approaches.iter().filter_map(move |approach| {
            approach
                .neo_id()
                .and_then(|id| self.neo(id))
                .map(|neo| LinkedApproach::new(approach, neo))
        })
    }

    /// Lazily yield the close approaches matching every predicate in `filters`.
    ///
    /// The iterator is single-pass; call again for a fresh pass.
    pub fn query<'a>(
        &'a self,
        filters: &'a FilterSet,
    ) -> impl Iterator<Item = LinkedApproach<'a>> + 'a {
        self.linked().filter(move |ca| filters.matches(ca))
    }

    pub fn len(&self) -> usize {
        self.approaches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.approaches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::parse_cad_time;

    fn approach(des: &str, time: &str, distance: f64, velocity: f64) -> CloseApproach {
        CloseApproach::new(des, parse_cad_time(time).ok(), Some(distance), Some(velocity))
    }

    fn sample() -> NeoDatabase {
        let neos = vec![
            NearEarthObject::new("2000433", Some("Eros"), Some(16.84), false),
            NearEarthObject::new("2004769", Some("Castalia"), None, true),
            NearEarthObject::new("2101955", None, Some(0.49), true),
        ];
        let approaches = vec![
            approach("2000433", "1900-Dec-27 01:30", 0.15, 5.5),
            approach("2004769", "1900-Jan-01 00:00", 0.02, 20.0),
            approach("2000433", "1901-Mar-04 12:00", 0.31, 6.1),
            approach("2101955", "1999-Sep-23 08:15", 0.004, 7.0),
        ];
        NeoDatabase::new(neos, approaches).unwrap()
    }

    #[test]
    fn test_links_every_approach() {
        let db = sample();

        for (row, ca) in db.approaches().iter().enumerate() {
            let id = ca.neo_id().expect("linked");
            let neo = db.neo(id).unwrap();
            assert_eq!(neo.designation, ca.designation);
            let owners = db
                .neos()
                .iter()
                .filter(|n| n.approach_ids().contains(&ApproachId(row)))
                .count();
            assert_eq!(owners, 1);
        }
    }

    #[test]
    fn test_backrefs_cover_dataset_in_order() {
        let db = sample();

        let eros = db.get_neo_by_designation("2000433").unwrap();
        assert_eq!(eros.approach_ids(), &[ApproachId(0), ApproachId(2)]);

        let mut all: Vec<ApproachId> = db
            .neos()
            .iter()
            .flat_map(|n| n.approach_ids().iter().copied())
            .collect();
        all.sort();
        let expected: Vec<ApproachId> = (0..db.len()).map(ApproachId).collect();
        assert_eq!(all, expected);
    }

    #[test]
    fn test_lookup_by_designation() {
        let db = sample();

        for neo in db.neos() {
            let found = db.get_neo_by_designation(&neo.designation).unwrap();
            assert_eq!(found, neo);
        }
        assert!(db.get_neo_by_designation("433").is_none());
        assert!(db.get_neo_by_designation("").is_none());
    }

    #[test]
    fn test_lookup_by_name() {
        let db = sample();

        assert_eq!(db.get_neo_by_name("Castalia").unwrap().designation, "2004769");
        assert!(db.get_neo_by_name("castalia").is_none());
        assert!(db.get_neo_by_name("").is_none());
    }

    #[test]
    fn test_name_collision_last_wins() {
        let neos = vec![
            NearEarthObject::new("1", Some("Twin"), None, false),
            NearEarthObject::new("2", Some("Twin"), None, false),
        ];
        let db = NeoDatabase::new(neos, Vec::new()).unwrap();

        assert_eq!(db.get_neo_by_name("Twin").unwrap().designation, "2");
        assert_eq!(db.get_neo_by_designation("1").unwrap().designation, "1");
    }

    #[test]
    fn test_duplicate_designation_is_rejected() {
        let neos = vec![
            NearEarthObject::new("433", Some("Eros"), None, false),
            NearEarthObject::new("433", None, None, false),
        ];
        let err = NeoDatabase::new(neos, Vec::new()).unwrap_err();

        match err {
            Error::DuplicateDesignation {
                designation,
                first_row,
                second_row,
            } => {
                assert_eq!(designation, "433");
                assert_eq!((first_row, second_row), (0, 1));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_designation_is_rejected() {
        let neos = vec![NearEarthObject::new("433", None, None, false)];
        let approaches = vec![
            approach("433", "2000-Jan-01 00:00", 0.1, 1.0),
            approach("99942", "2029-Apr-13 21:46", 0.0003, 7.4),
        ];
        let err = NeoDatabase::new(neos, approaches).unwrap_err();

        assert!(matches!(
            err,
            Error::UnknownDesignation { ref designation, approach_row: 1 } if designation == "99942"
        ));
    }

    #[test]
    fn test_resolve_requires_linking() {
        let db = sample();
        let loose = approach("2000433", "2000-Jan-01 00:00", 0.1, 1.0);

        assert!(matches!(db.resolve(&loose), Err(Error::Unlinked(_))));

        let linked = db.resolve(&db.approaches()[1]).unwrap();
        assert_eq!(linked.fullname(), "2004769 (Castalia)");
    }

    #[test]
    fn test_approaches_of() {
        let db = sample();
        let eros = db.get_neo_by_name("Eros").unwrap();

        let times: Vec<String> = db.approaches_of(eros).map(|ca| ca.time_str()).collect();
        assert_eq!(times, vec!["1900-12-27 01:30", "1901-03-04 12:00"]);
    }

    #[test]
    fn test_empty_filter_returns_everything() {
        let db = sample();
        let filters = FilterSet::default();

        assert_eq!(db.query(&filters).count(), db.len());
    }
}
