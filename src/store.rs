//! Status and sample source consumed by the telemetry commands.

use crate::telemetry::{AttitudeSample, PayloadKind, PayloadSample, StatusSnapshot, TemperatureSample};
use heapless::Vec;
use thiserror::Error;

pub const HISTORY_DEPTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("no {} sample at history depth {depth}", .kind.name())]
    NoSample { kind: PayloadKind, depth: usize },
}

/// Read-only queries the telemetry commands make.
///
/// Implementations shared between callers serialize access themselves.
pub trait DataStore {
    fn status_snapshot(&self) -> StatusSnapshot;

    /// Sample of `kind` recorded `depth` samples ago; depth 0 is the latest.
    fn recent_sample(&self, kind: PayloadKind, depth: usize) -> Result<PayloadSample, StoreError>;
}

/// Bounded in-memory store. The oldest sample is evicted when a history is full.
#[derive(Debug, Default)]
pub struct MemoryStore {
    status: StatusSnapshot,
    temperature: Vec<TemperatureSample, HISTORY_DEPTH>,
    attitude: Vec<AttitudeSample, HISTORY_DEPTH>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, status: StatusSnapshot) {
        self.status = status;
    }

    pub fn record(&mut self, sample: PayloadSample) {
        match sample {
            PayloadSample::Temperature(s) => push_evicting(&mut self.temperature, s),
            PayloadSample::Attitude(s) => push_evicting(&mut self.attitude, s),
        }
    }

    pub fn sample_count(&self, kind: PayloadKind) -> usize {
        match kind {
            PayloadKind::Temperature => self.temperature.len(),
            PayloadKind::Attitude => self.attitude.len(),
        }
    }

    /// A store filled with plausible orbit values, `samples` of each kind
    /// spaced ten seconds apart and ending at `now_s`.
    pub fn simulated(now_s: u32, samples: usize) -> Self {
        let mut store = Self::new();
        let count = samples.min(HISTORY_DEPTH) as u32;

        for i in (0..count).rev() {
            let t = now_s.saturating_sub(i * 10);
            let phase = (t as f32 / 5400.0) * 2.0 * core::f32::consts::PI;

            store.record(PayloadSample::Temperature(TemperatureSample {
                timestamp: t,
                obc_temp_1: 20.0 + phase.sin() * 15.0,
                obc_temp_2: 18.0 + phase.sin() * 12.0,
                obc_temp_3: 22.0 + phase.cos() * 5.0,
            }));
            store.record(PayloadSample::Attitude(AttitudeSample {
                timestamp: t,
                acc_x: phase.sin() * 0.02,
                acc_y: phase.cos() * 0.02,
                acc_z: 0.001,
                mag_x: 25.0 + phase.sin() * 5.0,
                mag_y: 15.0 + phase.cos() * 3.0,
                mag_z: 45.0 + (phase * 2.0).sin() * 2.0,
                gyro_x: 0.1,
                gyro_y: -0.05,
                gyro_z: 0.02,
            }));
        }

        let phase = (now_s as f32 / 5400.0) * 2.0 * core::f32::consts::PI;
        store.set_status(StatusSnapshot {
            obc_opmode: 1,
            obc_hrs_alive: now_s / 3600,
            obc_hrs_wo_reset: now_s / 3600,
            obc_reset_counter: 1,
            obc_temp_1: 20.0 + phase.sin() * 15.0,
            obc_temp_2: 18.0 + phase.sin() * 12.0,
            obc_temp_3: 22.0 + phase.cos() * 5.0,
            dep_ant_deployed: 1,
            dep_ant_tries: 1,
            dep_date_time: now_s.saturating_sub(1800),
            rtc_date_time: now_s,
            com_freq: 437_250_000,
            com_tx_pwr: 27,
            com_baud: 9600,
            com_bcn_period: 60,
            ads_acc: [phase.sin() * 0.02, phase.cos() * 0.02, 0.001],
            ads_mag: [25.0, 15.0, 45.0],
            eps_vbatt: (7400.0 + phase.cos() * 200.0) as u32,
            eps_cur_sun: if phase.sin() > 0.0 { 350 } else { 0 },
            eps_cur_sys: 180,
            eps_temp_bat0: 15,
            ..StatusSnapshot::default()
        });

        store
    }
}

fn push_evicting<T, const N: usize>(history: &mut Vec<T, N>, sample: T) {
    if history.is_full() {
        history.remove(0);
    }
    let _ = history.push(sample);
}

fn nth_latest<T: Copy, const N: usize>(history: &Vec<T, N>, depth: usize) -> Option<T> {
    history.iter().rev().nth(depth).copied()
}

impl DataStore for MemoryStore {
    fn status_snapshot(&self) -> StatusSnapshot {
        self.status
    }

    fn recent_sample(&self, kind: PayloadKind, depth: usize) -> Result<PayloadSample, StoreError> {
        let sample = match kind {
            PayloadKind::Temperature => nth_latest(&self.temperature, depth).map(PayloadSample::Temperature),
            PayloadKind::Attitude => nth_latest(&self.attitude, depth).map(PayloadSample::Attitude),
        };
        sample.ok_or(StoreError::NoSample { kind, depth })
    }
}
