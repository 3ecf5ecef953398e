//! Built-in uniform time-course integration methods.
//!
//! Every method has the `MethodFn` shape: a model handle plus the effective
//! argument mapping, producing a `time` series and one series per species
//! (keyed by species id). The executor injects the four time-course
//! arguments unconditionally and fills declared parameters from their
//! defaults, so a missing argument is a caller bug and fails the invocation.
//!
//! Integration advances from `initial_time` to `output_start_time`, then
//! records `number_of_points + 1` uniformly spaced outputs through
//! `output_end_time`.

use anyhow::{anyhow, bail};

use sedrun_core::{MethodArgs, RawResults, TIME_KEY};

use crate::model::Model;

/// Time-course window, pulled back out of the argument mapping.
struct Window {
    initial_time: f64,
    output_start_time: f64,
    output_end_time: f64,
    number_of_points: usize,
}

impl Window {
    fn from_args(args: &MethodArgs) -> anyhow::Result<Self> {
        let get = |name: &str| {
            args.get_f64(name)
                .ok_or_else(|| anyhow!("missing `{}` argument", name))
        };
        let number_of_points = args
            .get_i64("number_of_points")
            .ok_or_else(|| anyhow!("missing `number_of_points` argument"))?;
        if number_of_points < 0 {
            bail!("number_of_points must be non-negative, got {}", number_of_points);
        }

        let window = Self {
            initial_time: get("initial_time")?,
            output_start_time: get("output_start_time")?,
            output_end_time: get("output_end_time")?,
            number_of_points: number_of_points as usize,
        };
        if !window.initial_time.is_finite()
            || !window.output_start_time.is_finite()
            || !window.output_end_time.is_finite()
        {
            bail!("time course bounds must be finite");
        }
        if window.output_start_time < window.initial_time
            || window.output_end_time < window.output_start_time
        {
            bail!(
                "time course bounds out of order: initial {}, output {}..{}",
                window.initial_time,
                window.output_start_time,
                window.output_end_time
            );
        }
        Ok(window)
    }

    /// Uniform output grid, `number_of_points + 1` entries inclusive.
    fn grid(&self) -> Vec<f64> {
        let n = self.number_of_points;
        if n == 0 {
            return vec![self.output_start_time];
        }
        let span = self.output_end_time - self.output_start_time;
        (0..=n)
            .map(|i| self.output_start_time + span * i as f64 / n as f64)
            .collect()
    }
}

/// Forward Euler (`KISAO_0000030`). Fixed step size `step_size`.
pub fn euler(model: &Model, args: &MethodArgs) -> anyhow::Result<RawResults> {
    let window = Window::from_args(args)?;
    let h = positive_arg(args, "step_size")?;
    run(model, &window, |model, y, t0, t1| {
        advance_fixed(model, y, t0, t1, h, euler_step);
        Ok(())
    })
}

/// Explicit fourth-order Runge-Kutta (`KISAO_0000032`). Fixed step size
/// `step_size`.
pub fn rk4(model: &Model, args: &MethodArgs) -> anyhow::Result<RawResults> {
    let window = Window::from_args(args)?;
    let h = positive_arg(args, "step_size")?;
    run(model, &window, |model, y, t0, t1| {
        advance_fixed(model, y, t0, t1, h, rk4_step);
        Ok(())
    })
}

/// LSODA-style adaptive integration (`KISAO_0000560`): step-doubling RK4
/// controlled by the relative (`rtol`) and absolute (`atol`) tolerances,
/// bounded by `max_steps` accepted or rejected steps over the whole course.
pub fn lsoda(model: &Model, args: &MethodArgs) -> anyhow::Result<RawResults> {
    let window = Window::from_args(args)?;
    let rtol = positive_arg(args, "rtol")?;
    let atol = positive_arg(args, "atol")?;
    let max_steps = args
        .get_i64("max_steps")
        .ok_or_else(|| anyhow!("missing `max_steps` argument"))?;
    if max_steps <= 0 {
        bail!("max_steps must be positive, got {}", max_steps);
    }

    let mut steps = 0i64;
    run(model, &window, move |model, y, t0, t1| {
        advance_adaptive(model, y, t0, t1, rtol, atol, max_steps, &mut steps)
    })
}

fn positive_arg(args: &MethodArgs, name: &str) -> anyhow::Result<f64> {
    let value = args
        .get_f64(name)
        .ok_or_else(|| anyhow!("missing `{}` argument", name))?;
    if !value.is_finite() || value <= 0.0 {
        bail!("`{}` must be positive and finite, got {}", name, value);
    }
    Ok(value)
}

/// Drive an advance function across the output grid, recording the state at
/// every grid point.
fn run<F>(model: &Model, window: &Window, mut advance: F) -> anyhow::Result<RawResults>
where
    F: FnMut(&Model, &mut Vec<f64>, f64, f64) -> anyhow::Result<()>,
{
    let grid = window.grid();
    let mut y = model.initial_state();
    advance(model, &mut y, window.initial_time, window.output_start_time)?;

    let mut series: Vec<Vec<f64>> = vec![Vec::with_capacity(grid.len()); model.species.len()];
    let mut previous = window.output_start_time;
    for (i, &t) in grid.iter().enumerate() {
        if i > 0 {
            advance(model, &mut y, previous, t)?;
        }
        for (record, value) in series.iter_mut().zip(&y) {
            record.push(*value);
        }
        previous = t;
    }

    let mut raw = RawResults::new();
    raw.insert(TIME_KEY, grid);
    for (species, values) in model.species.iter().zip(series) {
        raw.insert(species.id.clone(), values);
    }
    Ok(raw)
}

fn advance_fixed(
    model: &Model,
    y: &mut Vec<f64>,
    t0: f64,
    t1: f64,
    h: f64,
    step: fn(&Model, &[f64], f64) -> Vec<f64>,
) {
    let span = t1 - t0;
    if span <= 0.0 {
        return;
    }
    let substeps = (span / h).ceil().max(1.0) as usize;
    let h = span / substeps as f64;
    for _ in 0..substeps {
        *y = step(model, y, h);
    }
}

#[allow(clippy::too_many_arguments)]
fn advance_adaptive(
    model: &Model,
    y: &mut Vec<f64>,
    t0: f64,
    t1: f64,
    rtol: f64,
    atol: f64,
    max_steps: i64,
    steps: &mut i64,
) -> anyhow::Result<()> {
    let span = t1 - t0;
    if span <= 0.0 {
        return Ok(());
    }

    let mut t = t0;
    let mut h = span;
    while t < t1 {
        h = h.min(t1 - t);
        if h < f64::EPSILON * span.max(1.0) {
            break;
        }
        if *steps >= max_steps {
            bail!(
                "maximum number of steps ({}) exceeded at t = {}",
                max_steps,
                t
            );
        }
        *steps += 1;

        // Step doubling: one full step against two half steps.
        let full = rk4_step(model, y, h);
        let mid = rk4_step(model, y, h / 2.0);
        let fine = rk4_step(model, &mid, h / 2.0);

        let error = full
            .iter()
            .zip(&fine)
            .map(|(a, b)| (a - b).abs() / (atol + rtol * b.abs()))
            .fold(0.0f64, f64::max);

        if error <= 1.0 {
            *y = fine;
            t += h;
            if error < 0.25 {
                h *= 2.0;
            }
        } else {
            h /= 2.0;
            if h < span * 1e-14 {
                bail!("step size underflow at t = {}", t);
            }
        }
    }
    Ok(())
}

fn euler_step(model: &Model, y: &[f64], h: f64) -> Vec<f64> {
    let mut dydt = vec![0.0; y.len()];
    model.derivatives(y, &mut dydt);
    y.iter().zip(&dydt).map(|(v, d)| v + h * d).collect()
}

fn rk4_step(model: &Model, y: &[f64], h: f64) -> Vec<f64> {
    let n = y.len();
    let mut k1 = vec![0.0; n];
    model.derivatives(y, &mut k1);

    let y2: Vec<f64> = y.iter().zip(&k1).map(|(v, k)| v + 0.5 * h * k).collect();
    let mut k2 = vec![0.0; n];
    model.derivatives(&y2, &mut k2);

    let y3: Vec<f64> = y.iter().zip(&k2).map(|(v, k)| v + 0.5 * h * k).collect();
    let mut k3 = vec![0.0; n];
    model.derivatives(&y3, &mut k3);

    let y4: Vec<f64> = y.iter().zip(&k3).map(|(v, k)| v + h * k).collect();
    let mut k4 = vec![0.0; n];
    model.derivatives(&y4, &mut k4);

    (0..n)
        .map(|i| y[i] + h / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sedrun_core::ParameterValue;

    use crate::model::tests::decay_model;

    fn time_course_args(extra: &[(&str, ParameterValue)]) -> MethodArgs {
        let mut args = MethodArgs::new();
        for (name, value) in extra {
            args.insert(*name, value.clone());
        }
        args.insert("initial_time", ParameterValue::Float(0.0));
        args.insert("output_start_time", ParameterValue::Float(0.0));
        args.insert("output_end_time", ParameterValue::Float(4.0));
        args.insert("number_of_points", ParameterValue::Integer(40));
        args
    }

    fn lsoda_args() -> MethodArgs {
        time_course_args(&[
            ("rtol", ParameterValue::Float(1e-8)),
            ("atol", ParameterValue::Float(1e-12)),
            ("max_steps", ParameterValue::Integer(20000)),
        ])
    }

    #[test]
    fn grid_is_inclusive_and_uniform() {
        let window = Window {
            initial_time: 0.0,
            output_start_time: 10.0,
            output_end_time: 20.0,
            number_of_points: 20,
        };
        let grid = window.grid();
        assert_eq!(grid.len(), 21);
        assert_eq!(grid[0], 10.0);
        assert_eq!(grid[20], 20.0);
        assert!((grid[1] - 10.5).abs() < 1e-12);
    }

    #[test]
    fn zero_points_records_a_single_output() {
        let window = Window {
            initial_time: 0.0,
            output_start_time: 5.0,
            output_end_time: 5.0,
            number_of_points: 0,
        };
        assert_eq!(window.grid(), vec![5.0]);
    }

    #[test]
    fn lsoda_matches_exponential_decay() {
        // A -> C at k = 0.5: A(t) = e^{-kt}, C(t) = 1 - A(t).
        let model = decay_model();
        let raw = lsoda(&model, &lsoda_args()).unwrap();

        let time = raw.get("time").unwrap();
        let a = raw.get("A").unwrap();
        let c = raw.get("C").unwrap();
        assert_eq!(time.len(), 41);
        for i in 0..time.len() {
            let expected = (-0.5 * time[i]).exp();
            assert!(
                (a[i] - expected).abs() < 1e-6,
                "A({}) = {}, expected {}",
                time[i],
                a[i],
                expected
            );
            assert!((a[i] + c[i] - 1.0).abs() < 1e-9, "mass not conserved");
        }
    }

    #[test]
    fn rk4_and_euler_track_the_same_solution() {
        let model = decay_model();
        let fine = time_course_args(&[("step_size", ParameterValue::Float(1e-3))]);

        let rk = rk4(&model, &fine).unwrap();
        let eu = euler(&model, &fine).unwrap();
        let a_rk = rk.get("A").unwrap();
        let a_eu = eu.get("A").unwrap();
        for i in 0..a_rk.len() {
            assert!((a_rk[i] - a_eu[i]).abs() < 1e-3);
        }
    }

    #[test]
    fn lsoda_respects_the_step_budget() {
        let model = decay_model();
        let args = time_course_args(&[
            ("rtol", ParameterValue::Float(1e-12)),
            ("atol", ParameterValue::Float(1e-14)),
            ("max_steps", ParameterValue::Integer(3)),
        ]);
        let err = lsoda(&model, &args).unwrap_err();
        assert!(err.to_string().contains("maximum number of steps"));
    }

    #[test]
    fn missing_arguments_fail_the_invocation() {
        let model = decay_model();
        let mut args = MethodArgs::new();
        args.insert("step_size", ParameterValue::Float(1e-3));
        let err = rk4(&model, &args).unwrap_err();
        assert!(err.to_string().contains("number_of_points"));
    }

    #[test]
    fn reversed_bounds_are_rejected() {
        let model = decay_model();
        let mut args = lsoda_args();
        args.insert("output_end_time", ParameterValue::Float(-1.0));
        assert!(lsoda(&model, &args).is_err());
    }
}
