use chrono::NaiveDate;

use super::model::LinkedApproach;

// ---------------------------------------------------------------------------
// Search criteria as supplied by the user
// ---------------------------------------------------------------------------

/// User-supplied bounds; every field is optional and `None` means "no constraint".
/// All bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    pub date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub distance_min: Option<f64>,
    pub distance_max: Option<f64>,
    pub velocity_min: Option<f64>,
    pub velocity_max: Option<f64>,
    pub diameter_min: Option<f64>,
    pub diameter_max: Option<f64>,
    pub hazardous: Option<bool>,
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    AtLeast,
    AtMost,
}

impl Comparison {
    /// Compare a possibly unknown value against a reference.
    /// Unknown never satisfies any comparison.
    pub fn holds<T: PartialOrd>(self, value: Option<T>, reference: T) -> bool {
        let Some(value) = value else {
            return false;
        };
        match self {
            Comparison::Eq => value == reference,
            Comparison::AtLeast => value >= reference,
            Comparison::AtMost => value <= reference,
        }
    }
}

/// A single test on one attribute of a close approach or of its NEO.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Predicate {
    /// Calendar date of the approach time.
    Date(Comparison, NaiveDate),
    Distance(Comparison, f64),
    Velocity(Comparison, f64),
    /// Diameter of the linked NEO.
    Diameter(Comparison, f64),
    /// Hazard flag of the linked NEO.
    Hazardous(bool),
}

impl Predicate {
    pub fn matches(&self, ca: &LinkedApproach<'_>) -> bool {
        match *self {
            Predicate::Date(op, date) => op.holds(ca.time.map(|t| t.date()), date),
            Predicate::Distance(op, au) => op.holds(ca.distance, au),
            Predicate::Velocity(op, kms) => op.holds(ca.velocity, kms),
            Predicate::Diameter(op, km) => op.holds(ca.neo().diameter, km),
            Predicate::Hazardous(flag) => ca.neo().hazardous == flag,
        }
    }
}

// ---------------------------------------------------------------------------
// FilterSet: conjunction of predicates
// ---------------------------------------------------------------------------

/// Predicates combined with logical AND. An empty set matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    predicates: Vec<Predicate>,
}

impl FilterSet {
    /// One predicate per supplied bound. Bound ordering is not validated:
    /// a minimum above the maximum simply matches nothing.
    pub fn from_criteria(criteria: &Criteria) -> Self {
        use Comparison::{AtLeast, AtMost, Eq};

        let bounds = [
            criteria.date.map(|d| Predicate::Date(Eq, d)),
            criteria.start_date.map(|d| Predicate::Date(AtLeast, d)),
            criteria.end_date.map(|d| Predicate::Date(AtMost, d)),
            criteria.distance_min.map(|v| Predicate::Distance(AtLeast, v)),
            criteria.distance_max.map(|v| Predicate::Distance(AtMost, v)),
            criteria.velocity_min.map(|v| Predicate::Velocity(AtLeast, v)),
            criteria.velocity_max.map(|v| Predicate::Velocity(AtMost, v)),
            criteria.diameter_min.map(|v| Predicate::Diameter(AtLeast, v)),
            criteria.diameter_max.map(|v| Predicate::Diameter(AtMost, v)),
            criteria.hazardous.map(Predicate::Hazardous),
        ];

        Self {
            predicates: bounds.into_iter().flatten().collect(),
        }
    }

    pub fn with(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn matches(&self, ca: &LinkedApproach<'_>) -> bool {
        self.predicates.iter().all(|p| p.matches(ca))
    }
}

/// Truncate `results` to at most `n` items. `None` or `Some(0)` is unbounded.
pub fn limit<I: Iterator>(results: I, n: Option<usize>) -> std::iter::Take<I> {
    let n = match n {
        None | Some(0) => usize::MAX,
        Some(n) => n,
    };
    results.take(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::database::NeoDatabase;
    use crate::data::model::{parse_cad_time, CloseApproach, NearEarthObject};

    fn sample() -> NeoDatabase {
        let neos = vec![
            NearEarthObject::new("2000433", Some("Eros"), Some(16.84), false),
            NearEarthObject::new("2004769", Some("Castalia"), None, true),
        ];
        let approaches = vec![
            CloseApproach::new("2000433", parse_cad_time("1900-Dec-27 01:30").ok(), Some(0.15), Some(5.5)),
            CloseApproach::new("2004769", parse_cad_time("1900-Jan-01 00:00").ok(), Some(0.02), Some(20.0)),
        ];
        NeoDatabase::new(neos, approaches).unwrap()
    }

    fn designations(db: &NeoDatabase, criteria: &Criteria, n: Option<usize>) -> Vec<String> {
        let filters = FilterSet::from_criteria(criteria);
        limit(db.query(&filters), n)
            .map(|ca| ca.designation.clone())
            .collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_no_criteria_is_identity() {
        let db = sample();
        assert!(FilterSet::from_criteria(&Criteria::default()).is_empty());
        assert_eq!(designations(&db, &Criteria::default(), None), vec!["2000433", "2004769"]);
    }

    #[test]
    fn test_hazardous() {
        let db = sample();
        let criteria = Criteria {
            hazardous: Some(true),
            ..Default::default()
        };
        assert_eq!(designations(&db, &criteria, None), vec!["2004769"]);

        let criteria = Criteria {
            hazardous: Some(false),
            ..Default::default()
        };
        assert_eq!(designations(&db, &criteria, None), vec!["2000433"]);
    }

    #[test]
    fn test_unknown_diameter_never_matches() {
        let db = sample();
        let criteria = Criteria {
            diameter_min: Some(10.0),
            ..Default::default()
        };
        assert_eq!(designations(&db, &criteria, None), vec!["2000433"]);

        let criteria = Criteria {
            diameter_max: Some(1000.0),
            ..Default::default()
        };
        assert_eq!(designations(&db, &criteria, None), vec!["2000433"]);
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let db = sample();

        let on = Criteria {
            date: Some(date(1900, 12, 27)),
            ..Default::default()
        };
        assert_eq!(designations(&db, &on, None), vec!["2000433"]);

        let range = Criteria {
            start_date: Some(date(1900, 1, 1)),
            end_date: Some(date(1900, 1, 1)),
            ..Default::default()
        };
        assert_eq!(designations(&db, &range, None), vec!["2004769"]);
    }

    #[test]
    fn test_distance_and_velocity_bounds() {
        let db = sample();

        let criteria = Criteria {
            distance_max: Some(0.15),
            velocity_min: Some(5.5),
            ..Default::default()
        };
        assert_eq!(designations(&db, &criteria, None), vec!["2000433", "2004769"]);

        let criteria = Criteria {
            distance_min: Some(0.1),
            velocity_min: Some(10.0),
            ..Default::default()
        };
        assert!(designations(&db, &criteria, None).is_empty());
    }

    #[test]
    fn test_inverted_bounds_match_nothing() {
        let db = sample();
        let criteria = Criteria {
            distance_min: Some(1.0),
            distance_max: Some(0.0),
            ..Default::default()
        };
        assert!(designations(&db, &criteria, None).is_empty());
    }

    #[test]
    fn test_unknown_time_fails_date_predicates() {
        let neos = vec![NearEarthObject::new("1", None, None, false)];
        let approaches = vec![CloseApproach::new("1", None, None, None)];
        let db = NeoDatabase::new(neos, approaches).unwrap();

        let filters = FilterSet::default().with(Predicate::Date(Comparison::AtMost, date(3000, 1, 1)));
        assert_eq!(db.query(&filters).count(), 0);

        let filters = FilterSet::default().with(Predicate::Distance(Comparison::AtLeast, 0.0));
        assert_eq!(db.query(&filters).count(), 0);
    }

    #[test]
    fn test_limit() {
        let db = sample();
        let all = designations(&db, &Criteria::default(), None);

        assert_eq!(designations(&db, &Criteria::default(), Some(0)), all);
        assert_eq!(designations(&db, &Criteria::default(), Some(1)), vec!["2000433"]);
        assert_eq!(designations(&db, &Criteria::default(), Some(5)), all);
    }

    #[test]
    fn test_limit_short_circuits() {
        let mut pulled = 0;
        let taken: Vec<u32> = limit(
            (0..100).inspect(|_| pulled += 1),
            Some(3),
        )
        .collect();

        assert_eq!(taken, vec![0, 1, 2]);
        assert_eq!(pulled, 3);
    }

    #[test]
    fn test_comparison_holds() {
        assert!(Comparison::Eq.holds(Some(1.0), 1.0));
        assert!(Comparison::AtLeast.holds(Some(2.0), 1.0));
        assert!(!Comparison::AtMost.holds(Some(2.0), 1.0));
        assert!(!Comparison::AtLeast.holds(None, f64::MIN));
        assert!(!Comparison::AtMost.holds(None, f64::MAX));
    }
}
