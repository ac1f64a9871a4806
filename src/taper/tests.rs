use approx::assert_relative_eq;
use rand::Rng;

use super::TaperResampler;

#[test]
fn constant_size_is_arithmetic() {
    let taper = TaperResampler::from_sizes(1., 1., 10.);
    assert!(!taper.is_bad());
    assert_relative_eq!(taper.ratio(), 1.);
    assert_eq!(taper.segments(), 10);
    assert_relative_eq!(taper.end(), 10.);
    assert_relative_eq!(taper.c(0), 0.05);
    assert_relative_eq!(taper.c(9), 0.95, epsilon = 1e-12);
}

#[test]
fn nearly_constant_size_tends_to_arithmetic_count() {
    for w2 in [1. + 1e-10, 1. + 1e-6, 1.001] {
        let taper = TaperResampler::from_sizes(1., w2, 10.);
        assert_eq!(taper.segments(), 10, "w2 = {}", w2);
    }
    let taper = TaperResampler::from_sizes(0.8, 0.8, 7.);
    assert_eq!(taper.segments(), (7.0_f64 / 0.8).round() as usize);
}

#[test]
fn growing_taper_spaces_out() {
    let taper = TaperResampler::from_sizes(0.5, 2., 20.);
    assert!(!taper.is_bad());
    assert!(taper.ratio() > 1.);
    let n = taper.segments();
    assert!(n >= 2);
    let first = taper.t(1) - taper.t(0);
    let last = taper.t(n) - taper.t(n - 1);
    assert!(last > first);
}

#[test]
fn shrinking_taper() {
    let taper = TaperResampler::from_sizes(2., 0.5, 20.);
    assert!(!taper.is_bad());
    assert!(taper.ratio() < 1.);
    assert!(taper.segments() >= 1);
}

#[test]
fn degenerate_rejection() {
    // ratio below the floor
    assert!(TaperResampler::new(0., 1., 0., 10.).is_bad());
    assert!(TaperResampler::new(-3., 1., 0., 10.).is_bad());
    // no addend and unit ratio
    assert!(TaperResampler::new(1., 0., 1., 10.).is_bad());
    // no addend and zero start
    assert!(TaperResampler::new(2., 0., 0., 10.).is_bad());
    // snapped onto the degenerate values
    assert!(TaperResampler::new(1. + 1e-10, 1e-10, 1., 10.).is_bad());

    // pure geometric growth is fine
    let geometric = TaperResampler::new(2., 0., 1., 16.);
    assert!(!geometric.is_bad());
    assert_eq!(geometric.segments(), 4);
    assert_relative_eq!(geometric.end(), 16.);

    assert!(TaperResampler::<f64>::try_from_sizes(0., 0., 10.).is_err());
    assert!(TaperResampler::<f64>::try_from_sizes(1., 1., 0.).is_err());
}

#[test]
fn segment_count_is_at_least_one() {
    let taper = TaperResampler::from_sizes(1., 1., 0.2);
    assert_eq!(taper.segments(), 1);
    assert_eq!(taper.control_parameters(), vec![0.]);
}

#[test]
fn control_parameters_span_unit_interval() {
    let taper = TaperResampler::from_sizes(0.3, 1.2, 12.);
    let params = taper.control_parameters();
    assert_eq!(params.len(), taper.segments());
    assert_eq!(params[0], 0.);
    assert_eq!(params[params.len() - 1], 1.);
    assert!(params.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn random_sizes_always_solve() {
    let mut rng = rand::rng();
    for _ in 0..500 {
        let w1: f64 = rng.random_range(0.05..3.0);
        let w2: f64 = rng.random_range(0.05..3.0);
        let length = w1.max(w2) + rng.random_range(0.01..50.0);
        let taper = TaperResampler::try_from_sizes(w1, w2, length).unwrap();
        assert!(taper.segments() >= 1);
        let params = taper.control_parameters();
        assert!(params.iter().all(|p| (0. ..=1.).contains(p)));
        assert!(params.windows(2).all(|w| w[0] <= w[1]));
    }
}
