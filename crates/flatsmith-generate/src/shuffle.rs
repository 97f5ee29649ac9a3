//! Field shuffling across generated records.

use rand::Rng;
use tracing::debug;

use crate::records::FieldSlot;

/// Copy `count` randomly chosen slots from `donor` into `target`.
///
/// Slots are drawn with replacement, so at most `count` distinct fields
/// change.
pub fn shuffle_slots<T>(
    target: &mut T,
    donor: &T,
    slots: &[FieldSlot<T>],
    count: usize,
    rng: &mut impl Rng,
) {
    if slots.is_empty() {
        return;
    }
    for _ in 0..count {
        let slot = &slots[rng.random_range(0..slots.len())];
        (slot.copy)(donor, target);
    }
}

/// Walk `records`, giving each a coin-flip chance of being mutated. Every
/// mutated record receives `count` fields from a fresh donor produced by
/// `make_donor`.
pub fn shuffle_records<T, R, F>(
    records: &mut [T],
    slots: &[FieldSlot<T>],
    count: usize,
    mut make_donor: F,
    rng: &mut R,
) where
    R: Rng,
    F: FnMut(&mut R) -> T,
{
    let mut mutated = 0_usize;
    for record in records.iter_mut() {
        if !rng.random_bool(0.5) {
            continue;
        }
        let donor = make_donor(rng);
        shuffle_slots(record, &donor, slots, count, rng);
        mutated += 1;
    }
    debug!(mutated, total = records.len(), "shuffle pass complete");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakers::fake_user;
    use crate::records::FakeUser;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn zero_count_leaves_target_alone() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let donor = fake_user(99, &mut rng);
        let mut target = fake_user(1, &mut rng);
        let before = target.clone();
        shuffle_slots(&mut target, &donor, FakeUser::shuffle_slots(), 0, &mut rng);
        assert_eq!(target, before);
    }

    #[test]
    fn shuffle_never_touches_id() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let donor = fake_user(99, &mut rng);
        let mut target = fake_user(1, &mut rng);
        shuffle_slots(
            &mut target,
            &donor,
            FakeUser::shuffle_slots(),
            100,
            &mut rng,
        );
        assert_eq!(target.id, 1);
    }

    #[test]
    fn large_count_converges_to_donor_fields() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let donor = fake_user(99, &mut rng);
        let mut target = fake_user(1, &mut rng);
        // With count far above the slot count every field is overwritten
        // with overwhelming probability under a fixed seed.
        shuffle_slots(
            &mut target,
            &donor,
            FakeUser::shuffle_slots(),
            200,
            &mut rng,
        );
        assert_eq!(target.email, donor.email);
        assert_eq!(target.user_name, donor.user_name);
        assert_eq!(target.id, 1);
    }

    #[test]
    fn dataset_shuffle_is_deterministic() {
        let mut seed_rng = ChaCha8Rng::seed_from_u64(11);
        let base: Vec<FakeUser> = (1..=20).map(|id| fake_user(id, &mut seed_rng)).collect();

        let run = |seed: u64| {
            let mut records = base.clone();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            shuffle_records(
                &mut records,
                FakeUser::shuffle_slots(),
                2,
                |rng| fake_user(0, rng),
                &mut rng,
            );
            records
        };

        assert_eq!(run(7), run(7));
        assert_ne!(run(7), base, "a 20 record pass should mutate something");
    }
}
