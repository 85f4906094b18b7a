/// Sample times `0, dt, 2 dt, …` on the half-open interval `[0, max_time)`.
///
/// The count is `ceil(max_time / dt)`, the same grid `arange(0, max_time, dt)`
/// produces. Non-positive or non-finite inputs yield an empty grid.
pub fn sample_times(time_step: f64, max_time: f64) -> Vec<f64> {
    if !(time_step.is_finite() && max_time.is_finite()) || time_step <= 0.0 || max_time <= 0.0 {
        return Vec::new();
    }
    let count = (max_time / time_step).ceil() as usize;
    (0..count)
        .map(|i| i as f64 * time_step)
        .take_while(|t| *t < max_time)
        .collect()
}
