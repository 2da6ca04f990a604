/// Nice step (1, 2 or 5 times a power of ten) for roughly `count` ticks over
/// `[start, stop]`. Returns NaN when `count` is not positive and negative infinity
/// for an empty span.
pub fn tick_increment(start: f64, stop: f64, count: f64) -> f64 {
    if !(count > 0.0) {
        return f64::NAN;
    }

    if start == stop {
        return f64::NEG_INFINITY;
    }

    let step = (stop - start) / count;
    if step == 0.0 {
        return f64::NAN;
    }

    let power = step.log10().floor();
    let error = step / 10.0_f64.powf(power);
    let factor = if error >= 50.0_f64.sqrt() {
        10.0
    } else if error >= 10.0_f64.sqrt() {
        5.0
    } else if error >= 2.0_f64.sqrt() {
        2.0
    } else {
        1.0
    };
    10.0_f64.powf(power) * factor
}

/// Signed version of [`tick_increment`]: negative when `stop < start`.
pub fn tick_step(start: f64, stop: f64, count: f64) -> f64 {
    if stop < start {
        -tick_increment(stop, start, count)
    } else {
        tick_increment(start, stop, count)
    }
}

/// Whole number of units to step by, never less than one.
pub(crate) fn whole_step(step: f64) -> i64 {
    if step.is_finite() && step >= 1.0 {
        step.trunc() as i64
    } else {
        1
    }
}
