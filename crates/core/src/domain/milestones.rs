//! Progress-ring geometry for the summary cards.

use std::f64::consts::PI;

const FIRST_MILESTONES: [i64; 5] = [100, 250, 500, 750, 1000];
const RING_RADIUS: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Milestones {
    pub previous: i64,
    pub current: i64,
    pub percentage: f64,
    pub dasharray: f64,
    pub dashoffset: f64,
}

pub fn circle_circumference() -> f64 {
    2.0 * PI * RING_RADIUS
}

/// Places `value` between the milestone below it and the one it is working
/// towards. The ladder is 100, 250, 500, 750, 1000 and then every thousand.
pub fn calculate_milestones(value: i64) -> Milestones {
    let value = value.max(0);
    let max_milestone = ((value / 1000) + 1) * 1000;

    let ladder = FIRST_MILESTONES
        .into_iter()
        .chain((2000..=max_milestone).step_by(1000));

    let mut previous = 0;
    let mut current = None;
    for milestone in ladder {
        if milestone < value {
            previous = previous.max(milestone);
        } else if current.is_none_or(|c| milestone < c) {
            current = Some(milestone);
        }
    }
    let current = current.unwrap_or(100);

    let percentage = (value - previous) as f64 / (current - previous) as f64 * 100.0;
    let circumference = circle_circumference();

    Milestones {
        previous,
        current,
        percentage,
        dasharray: circumference,
        dashoffset: circumference * (1.0 - percentage / 100.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn zero_sits_at_start_of_first_ring() {
        let m = calculate_milestones(0);
        assert_eq!((m.previous, m.current), (0, 100));
        assert_close(m.percentage, 0.0);
        assert_close(m.dashoffset, circle_circumference());
    }

    #[test]
    fn early_ladder_uses_fixed_steps() {
        let m = calculate_milestones(300);
        assert_eq!((m.previous, m.current), (250, 500));
        assert_close(m.percentage, 20.0);

        let m = calculate_milestones(750);
        assert_eq!((m.previous, m.current), (500, 750));
        assert_close(m.percentage, 100.0);
        assert_close(m.dashoffset, 0.0);
    }

    #[test]
    fn large_values_step_by_thousands() {
        let m = calculate_milestones(4321);
        assert_eq!((m.previous, m.current), (4000, 5000));
        assert_close(m.percentage, 32.1);
        assert_close(m.dasharray, 2.0 * PI * 40.0);
        assert_close(m.dashoffset, m.dasharray * (1.0 - 0.321));
    }

    #[test]
    fn exact_thousand_completes_its_ring() {
        let m = calculate_milestones(3000);
        assert_eq!((m.previous, m.current), (2000, 3000));
        assert_close(m.percentage, 100.0);
    }

    #[test]
    fn negative_values_clamp_to_zero() {
        assert_eq!(calculate_milestones(-5), calculate_milestones(0));
    }
}
