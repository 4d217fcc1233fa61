use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::{sleep, Duration};
use tracing::info;

/// Picks a delay in `[min_delay, max_delay]` milliseconds. Bounds given in the
/// wrong order are swapped.
pub fn random_delay_ms(min_delay: u64, max_delay: u64) -> u64 {
    let (low, high) = if min_delay <= max_delay {
        (min_delay, max_delay)
    } else {
        (max_delay, min_delay)
    };
    let mut rng = StdRng::from_entropy();
    rng.gen_range(low..=high)
}

pub async fn generate_random_delay(min_delay: u64, max_delay: u64) {
    let delay = random_delay_ms(min_delay, max_delay);

    info!(delay_ms = delay, "pausing before next category");
    sleep(Duration::from_millis(delay)).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_within_bounds() {
        for _ in 0..200 {
            let delay = random_delay_ms(2000, 5000);
            assert!((2000..=5000).contains(&delay));
        }
    }

    #[test]
    fn equal_bounds_and_swapped_bounds() {
        assert_eq!(random_delay_ms(0, 0), 0);
        let delay = random_delay_ms(50, 10);
        assert!((10..=50).contains(&delay));
    }

    #[tokio::test]
    async fn zero_delay_returns_immediately() {
        let started = std::time::Instant::now();
        generate_random_delay(0, 0).await;
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
