/// Linear axis with tick generation and data→pixel mapping.
#[derive(Debug, Clone)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub label: String,
    pub tick_positions: Vec<f64>,
    pub tick_labels: Vec<String>,
    pub minor_ticks: Vec<f64>,
}

impl Axis {
    /// Auto-scale axis with "nice number" ticks; the range is widened to the
    /// enclosing tick positions.
    pub fn auto_linear(data_min: f64, data_max: f64, target_ticks: usize) -> Self {
        let (nice_min, nice_max, step) = nice_range(data_min, data_max, target_ticks);
        Self::with_ticks(nice_min, nice_max, step)
    }

    /// Axis pinned to `[min, max]` with nice ticks inside it. Histogram x axes
    /// use this so the frame matches the bin range exactly.
    pub fn bounded(min: f64, max: f64, target_ticks: usize) -> Self {
        let (_, _, step) = nice_range(min, max, target_ticks);
        let mut axis = Self::with_ticks((min / step).ceil() * step, max, step);
        axis.min = min;
        axis.max = max;
        axis
    }

    fn with_ticks(from: f64, to: f64, step: f64) -> Self {
        let mut axis = Self {
            min: from,
            max: to,
            label: String::new(),
            tick_positions: Vec::new(),
            tick_labels: Vec::new(),
            minor_ticks: Vec::new(),
        };
        if !(from.is_finite() && to.is_finite() && step.is_finite() && step > 0.0) {
            return axis;
        }

        let mut ticks = Vec::new();
        let mut labels = Vec::new();
        let mut i = 0;
        loop {
            let v = from + step * i as f64;
            if v > to + step * 0.01 {
                break;
            }
            ticks.push(v);
            labels.push(format_tick(v, step));
            i += 1;
        }

        // 5 subdivisions per major
        let minor_step = step / 5.0;
        let mut minor = Vec::new();
        let mut j = 0;
        loop {
            let mv = from + minor_step * j as f64;
            if mv > to + minor_step * 0.01 {
                break;
            }
            if j % 5 != 0 {
                minor.push(mv);
            }
            j += 1;
        }

        axis.tick_positions = ticks;
        axis.tick_labels = labels;
        axis.minor_ticks = minor;
        axis
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Map a data value to pixel coordinate.
    pub fn data_to_pixel(&self, value: f64, px_min: f64, px_max: f64) -> f64 {
        let frac = (value - self.min) / (self.max - self.min);
        px_min + frac * (px_max - px_min)
    }
}

/// "Nice numbers" algorithm for pleasant tick spacing.
fn nice_range(data_min: f64, data_max: f64, target_ticks: usize) -> (f64, f64, f64) {
    if (data_max - data_min).abs() < 1e-15 {
        return (data_min - 1.0, data_max + 1.0, 1.0);
    }
    let range = data_max - data_min;
    let rough_step = range / (target_ticks.max(2) - 1) as f64;
    let step = nice_step(rough_step);
    let nice_min = (data_min / step).floor() * step;
    let nice_max = (data_max / step).ceil() * step;
    (nice_min, nice_max, step)
}

fn nice_step(rough: f64) -> f64 {
    let exp = rough.abs().log10().floor();
    let frac = rough / 10.0_f64.powf(exp);
    let nice_frac = if frac <= 1.5 {
        1.0
    } else if frac <= 3.5 {
        2.0
    } else if frac <= 7.5 {
        5.0
    } else {
        10.0
    };
    nice_frac * 10.0_f64.powf(exp)
}

fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 { 0 } else { (-step.log10().floor()) as usize };
    if decimals == 0 {
        // Avoid "-0"
        let v = if value.abs() < step * 0.01 { 0.0 } else { value };
        format!("{}", v.round() as i64)
    } else {
        format!("{:.prec$}", value, prec = decimals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_linear_encloses_data() {
        let ax = Axis::auto_linear(0.0, 13.0, 5);
        assert!(ax.min <= 0.0);
        assert!(ax.max >= 13.0);
        assert_eq!(ax.tick_labels.first().map(String::as_str), Some("0"));
    }

    #[test]
    fn bounded_keeps_exact_range() {
        let ax = Axis::bounded(0.0, 50.0, 6);
        assert_eq!((ax.min, ax.max), (0.0, 50.0));
        assert_eq!(ax.tick_labels, ["0", "10", "20", "30", "40", "50"]);
        assert_eq!(ax.minor_ticks.len(), 20);
    }

    #[test]
    fn data_to_pixel() {
        let ax = Axis::bounded(0.0, 50.0, 6);
        assert!((ax.data_to_pixel(25.0, 100.0, 300.0) - 200.0).abs() < 1e-9);
        // y axes map bottom→top.
        assert!((ax.data_to_pixel(50.0, 300.0, 100.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn nice_step_values() {
        assert!((nice_step(3.2) - 2.0).abs() < 1e-9);
        assert!((nice_step(0.7) - 0.5).abs() < 1e-9);
        assert!((nice_step(15.0) - 10.0).abs() < 1e-9);
        assert!((nice_step(4.5) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn tick_formatting() {
        assert_eq!(format_tick(-0.0, 1.0), "0");
        assert_eq!(format_tick(2.5, 0.5), "2.5");
        assert_eq!(format_tick(0.25, 0.05), "0.25");
    }

    #[test]
    fn unrepresentable_range_has_no_ticks() {
        let ax = Axis::bounded(-1e308, 1e308, 6);
        assert_eq!((ax.min, ax.max), (-1e308, 1e308));
        assert!(ax.tick_positions.is_empty());
        assert!(ax.minor_ticks.is_empty());

        let ax = Axis::auto_linear(0.0, f64::INFINITY, 5);
        assert!(ax.tick_labels.is_empty());
    }

    #[test]
    fn flat_range_is_widened() {
        let ax = Axis::auto_linear(3.0, 3.0, 5);
        assert!(ax.min < 3.0 && ax.max > 3.0);
    }
}
