//! Fixed-step explicit Euler driver for model-exchange units.
//!
//! The step size is constant and independent of the experiment tolerance; the
//! tolerance only reaches the unit through `setup_experiment`.

use cf_core::advance_towards;
use tracing::{debug, info};

use crate::error::{ComponentResult, on_status};
use crate::fmi::{EventInfo, ModelExchange};

/// Nominal integration step.
pub const H_DEFAULT: f64 = 1e-2;

/// Run `new_discrete_states` until the unit needs no further discrete update
/// or asks to terminate.
pub fn event_iteration(me: &mut dyn ModelExchange, instance: &str) -> ComponentResult<EventInfo> {
    loop {
        let info = me
            .new_discrete_states()
            .map_err(on_status(instance, "fmi2NewDiscreteStates"))?;
        if !info.new_discrete_states_needed || info.terminate_simulation {
            return Ok(info);
        }
    }
}

/// Integration buffers of one model-exchange unit. Sized once from the model
/// description and never resized.
#[derive(Debug, Clone)]
pub struct EulerState {
    states: Vec<f64>,
    derivatives: Vec<f64>,
    indicators: Vec<f64>,
    previous_indicators: Vec<f64>,
    next_event_time: Option<f64>,
    call_event_update: bool,
    terminate: bool,
    step_size: f64,
}

impl EulerState {
    /// Allocate buffers and read the initial continuous state. The unit must
    /// already be in continuous-time mode.
    pub fn new(
        me: &mut dyn ModelExchange,
        instance: &str,
        after_init: EventInfo,
    ) -> ComponentResult<Self> {
        let description = me.description();
        let nx = description.number_of_states();
        let nz = description.number_of_event_indicators;

        let mut state = Self {
            states: vec![0.0; nx],
            derivatives: vec![0.0; nx],
            indicators: vec![0.0; nz],
            previous_indicators: vec![0.0; nz],
            next_event_time: after_init.next_event_time,
            call_event_update: false,
            terminate: after_init.terminate_simulation,
            step_size: H_DEFAULT,
        };
        state.refresh(me, instance)?;
        state.previous_indicators.copy_from_slice(&state.indicators);
        debug!("{instance}: {nx} states, {nz} event indicators");
        Ok(state)
    }

    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    pub fn states(&self) -> &[f64] {
        &self.states
    }

    pub fn terminated(&self) -> bool {
        self.terminate
    }

    fn refresh(&mut self, me: &mut dyn ModelExchange, instance: &str) -> ComponentResult<()> {
        me.get_continuous_states(&mut self.states)
            .map_err(on_status(instance, "fmi2GetContinuousStates"))?;
        me.get_derivatives(&mut self.derivatives)
            .map_err(on_status(instance, "fmi2GetDerivatives"))?;
        me.get_event_indicators(&mut self.indicators)
            .map_err(on_status(instance, "fmi2GetEventIndicators"))?;
        Ok(())
    }

    fn zero_crossing(&self) -> bool {
        self.indicators
            .iter()
            .zip(&self.previous_indicators)
            .any(|(z, prev)| (*z > 0.0) != (*prev > 0.0))
    }

    /// Integrate from `*time` to `stop`. `on_event` runs after every handled
    /// event with the event time.
    pub fn advance(
        &mut self,
        me: &mut dyn ModelExchange,
        instance: &str,
        time: &mut f64,
        stop: f64,
        on_event: &mut dyn FnMut(&mut dyn ModelExchange, f64) -> ComponentResult<()>,
    ) -> ComponentResult<()> {
        while *time < stop && !self.terminate {
            me.set_time(*time).map_err(on_status(instance, "fmi2SetTime"))?;

            std::mem::swap(&mut self.indicators, &mut self.previous_indicators);
            me.get_event_indicators(&mut self.indicators)
                .map_err(on_status(instance, "fmi2GetEventIndicators"))?;

            let zero_crossing = self.zero_crossing();
            let time_event = self.next_event_time.is_some_and(|te| te <= *time);

            if self.call_event_update || zero_crossing || time_event {
                debug!(
                    "{instance}: event at t={} (step={}, state={}, time={})",
                    *time, self.call_event_update, zero_crossing, time_event
                );
                me.enter_event_mode()
                    .map_err(on_status(instance, "fmi2EnterEventMode"))?;
                let info = event_iteration(me, instance)?;
                self.terminate = info.terminate_simulation;
                self.next_event_time = info.next_event_time;
                me.enter_continuous_time_mode()
                    .map_err(on_status(instance, "fmi2EnterContinuousTimeMode"))?;
                self.refresh(me, instance)?;
                on_event(me, *time)?;
            }

            if self.terminate {
                info!("{instance}: simulation terminated by the unit at t={}", *time);
                break;
            }

            let target = match self.next_event_time {
                Some(te) if te > *time && te < stop => te,
                _ => stop,
            };
            let next = advance_towards(*time, self.step_size, target);
            let h = next - *time;
            *time = next;
            me.set_time(*time).map_err(on_status(instance, "fmi2SetTime"))?;

            for (x, dx) in self.states.iter_mut().zip(&self.derivatives) {
                *x += h * dx;
            }
            me.set_continuous_states(&self.states)
                .map_err(on_status(instance, "fmi2SetContinuousStates"))?;
            me.get_derivatives(&mut self.derivatives)
                .map_err(on_status(instance, "fmi2GetDerivatives"))?;

            let outcome = me
                .completed_integrator_step(true)
                .map_err(on_status(instance, "fmi2CompletedIntegratorStep"))?;
            self.call_event_update = outcome.enter_event_mode;
            self.terminate = outcome.terminate_simulation;
        }
        Ok(())
    }
}
