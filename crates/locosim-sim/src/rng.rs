//! Randomness for effects.
//!
//! Crash debris spread and lifetimes are drawn from a hash of the spawn
//! position and a per-simulation draw counter, so two simulations fed the same
//! events throw identical debris. `Simulation::random` owns the counter.

/// Mix a spawn position with a draw salt into 32 random bits.
pub(crate) fn sim_hash(x: i32, y: i32, z: i32, salt: u32) -> u32 {
    let mut state = (x as u32)
        .wrapping_mul(0x9E3779B9)
        .wrapping_add((y as u32).wrapping_mul(0x517CC1B7))
        .wrapping_add((z as u32).wrapping_mul(0x6C62272E))
        .wrapping_add(salt.wrapping_mul(0x2545F491));

    // Avalanche
    state ^= state >> 16;
    state = state.wrapping_mul(0x45D9F3B);
    state ^= state >> 16;
    state = state.wrapping_mul(0x45D9F3B);
    state ^= state >> 16;

    state
}

/// Low 16 bits of a hash as a signed value.
pub(crate) fn hash_to_i16(hash: u32) -> i16 {
    (hash & 0xFFFF) as u16 as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        assert_eq!(sim_hash(5, 10, 3, 42), sim_hash(5, 10, 3, 42));
    }

    #[test]
    fn test_different_inputs_differ() {
        let vals = [
            sim_hash(0, 0, 0, 0),
            sim_hash(1, 0, 0, 0),
            sim_hash(0, 1, 0, 0),
            sim_hash(0, 0, 1, 0),
            sim_hash(0, 0, 0, 1),
        ];
        for i in 0..vals.len() {
            for j in (i + 1)..vals.len() {
                assert_ne!(vals[i], vals[j], "hash collision at indices {i}, {j}");
            }
        }
    }

    #[test]
    fn test_distribution() {
        let mut low_count = 0u32;
        for x in 0..100 {
            for y in 0..100 {
                if sim_hash(x, y, 0, 0) < u32::MAX / 2 {
                    low_count += 1;
                }
            }
        }
        let low_frac = low_count as f32 / 10_000.0;
        assert!(low_frac > 0.4 && low_frac < 0.6, "poor distribution: {low_frac}");
    }

    #[test]
    fn test_hash_to_i16_covers_sign() {
        let mut negative = false;
        let mut positive = false;
        for salt in 0..64 {
            let v = hash_to_i16(sim_hash(7, 7, 7, salt));
            negative |= v < 0;
            positive |= v > 0;
        }
        assert!(negative && positive);
    }
}
