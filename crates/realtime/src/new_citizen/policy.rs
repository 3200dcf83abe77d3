use crate::citizen::{EducationLevel, RawAge};
use crate::game_params::{AgeBand, NewCitizenParams};

/// Outcome of the new citizen policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CitizenDecision {
    pub education: EducationLevel,
    pub age: RawAge,
}

impl CitizenDecision {
    /// Whether the policy moved the age away from the requested one.
    pub fn age_adjusted(&self, requested: RawAge) -> bool {
        self.age != requested
    }
}

/// Index of the band containing `age`: the last band starting at or below it.
pub fn band_index(bands: &[AgeBand], age: RawAge) -> Option<usize> {
    bands.iter().rposition(|band| band.first_age <= age.0)
}

/// Education level the band table assigns to `age`.
pub fn band_education(params: &NewCitizenParams, age: RawAge) -> Option<EducationLevel> {
    band_index(&params.bands, age).map(|i| params.bands[i].education)
}

/// Decide education and age for a new citizen.
///
/// The returned education is never below `current`. If `current` is above
/// what the age band grants and the next band granting it starts within
/// `boundary_margin`, the age is moved onto that band's first age.
pub fn decide(
    params: &NewCitizenParams,
    raw_age: RawAge,
    current: EducationLevel,
) -> CitizenDecision {
    let Some(index) = band_index(&params.bands, raw_age) else {
        return CitizenDecision {
            education: current,
            age: raw_age,
        };
    };

    let band = params.bands[index];
    let mut education = band.education.max(current);
    let mut age = raw_age;

    if education > band.education {
        let target = params.bands[index + 1..]
            .iter()
            .find(|b| b.education >= education);
        if let Some(target) = target {
            let gap = target.first_age.checked_sub(raw_age.0);
            if gap.is_some_and(|gap| gap <= params.boundary_margin) {
                age = RawAge(target.first_age);
                education = education.max(target.education);
            }
        }
    }

    CitizenDecision { education, age }
}
