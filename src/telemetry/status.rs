use crate::codec::{CodecError, FrameDecode, FrameEncode, WireReader, WireWriter};
use crate::frame::FRAME_PAYLOAD_CAPACITY;
use serde::{Deserialize, Serialize};
use static_assertions::const_assert;

/// Housekeeping snapshot downlinked in `STATUS` frames.
///
/// Field order is the wire order. Temperatures are degrees Celsius,
/// voltages millivolts, currents milliamps, times seconds since epoch.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatusSnapshot {
    // On-board computer
    pub obc_opmode: u8,
    pub obc_last_reset: u8,
    pub obc_hrs_alive: u32,
    pub obc_hrs_wo_reset: u32,
    pub obc_reset_counter: u32,
    pub obc_sw_wdt: u32,
    pub obc_temp_1: f32,
    pub obc_temp_2: f32,
    pub obc_temp_3: f32,

    // Deployment
    pub dep_ant_deployed: u8,
    pub dep_ant_tries: u8,
    pub dep_date_time: u32,

    pub rtc_date_time: u32,

    // Communications
    pub com_count_tm: u32,
    pub com_count_tc: u32,
    pub com_last_tc: u32,
    pub com_freq: u32,
    pub com_tx_pwr: u8,
    pub com_baud: u32,
    pub com_mode: u8,
    pub com_bcn_period: u32,

    // Flight plan
    pub fpl_last: u32,
    pub fpl_queue: u32,

    // Attitude determination
    pub ads_acc: [f32; 3],
    pub ads_mag: [f32; 3],

    // Power
    pub eps_vbatt: u32,
    pub eps_cur_sun: u32,
    pub eps_cur_sys: u32,
    pub eps_temp_bat0: i32,
}

// Six single-byte fields, everything else is four bytes wide
const_assert!(StatusSnapshot::ENCODED_LEN == 6 + 27 * 4);
const_assert!(StatusSnapshot::ENCODED_LEN < FRAME_PAYLOAD_CAPACITY);

impl FrameEncode for StatusSnapshot {
    const ENCODED_LEN: usize = 114;

    fn encode_into(&self, w: &mut WireWriter<'_>) {
        w.put_u8(self.obc_opmode);
        w.put_u8(self.obc_last_reset);
        w.put_u32(self.obc_hrs_alive);
        w.put_u32(self.obc_hrs_wo_reset);
        w.put_u32(self.obc_reset_counter);
        w.put_u32(self.obc_sw_wdt);
        w.put_f32(self.obc_temp_1);
        w.put_f32(self.obc_temp_2);
        w.put_f32(self.obc_temp_3);

        w.put_u8(self.dep_ant_deployed);
        w.put_u8(self.dep_ant_tries);
        w.put_u32(self.dep_date_time);

        w.put_u32(self.rtc_date_time);

        w.put_u32(self.com_count_tm);
        w.put_u32(self.com_count_tc);
        w.put_u32(self.com_last_tc);
        w.put_u32(self.com_freq);
        w.put_u8(self.com_tx_pwr);
        w.put_u32(self.com_baud);
        w.put_u8(self.com_mode);
        w.put_u32(self.com_bcn_period);

        w.put_u32(self.fpl_last);
        w.put_u32(self.fpl_queue);

        w.put_f32_array(&self.ads_acc);
        w.put_f32_array(&self.ads_mag);

        w.put_u32(self.eps_vbatt);
        w.put_u32(self.eps_cur_sun);
        w.put_u32(self.eps_cur_sys);
        w.put_i32(self.eps_temp_bat0);
    }
}

impl FrameDecode for StatusSnapshot {
    fn decode_from(r: &mut WireReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            obc_opmode: r.get_u8()?,
            obc_last_reset: r.get_u8()?,
            obc_hrs_alive: r.get_u32()?,
            obc_hrs_wo_reset: r.get_u32()?,
            obc_reset_counter: r.get_u32()?,
            obc_sw_wdt: r.get_u32()?,
            obc_temp_1: r.get_f32()?,
            obc_temp_2: r.get_f32()?,
            obc_temp_3: r.get_f32()?,
            dep_ant_deployed: r.get_u8()?,
            dep_ant_tries: r.get_u8()?,
            dep_date_time: r.get_u32()?,
            rtc_date_time: r.get_u32()?,
            com_count_tm: r.get_u32()?,
            com_count_tc: r.get_u32()?,
            com_last_tc: r.get_u32()?,
            com_freq: r.get_u32()?,
            com_tx_pwr: r.get_u8()?,
            com_baud: r.get_u32()?,
            com_mode: r.get_u8()?,
            com_bcn_period: r.get_u32()?,
            fpl_last: r.get_u32()?,
            fpl_queue: r.get_u32()?,
            ads_acc: r.get_f32_array()?,
            ads_mag: r.get_f32_array()?,
            eps_vbatt: r.get_u32()?,
            eps_cur_sun: r.get_u32()?,
            eps_cur_sys: r.get_u32()?,
            eps_temp_bat0: r.get_i32()?,
        })
    }
}

impl StatusSnapshot {
    pub fn to_bytes(&self) -> [u8; StatusSnapshot::ENCODED_LEN] {
        let mut out = [0u8; StatusSnapshot::ENCODED_LEN];
        self.encode_into(&mut WireWriter::new(&mut out));
        out
    }
}

impl core::fmt::Display for StatusSnapshot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "obc_opmode: {}", self.obc_opmode)?;
        writeln!(f, "obc_last_reset: {}", self.obc_last_reset)?;
        writeln!(f, "obc_hrs_alive: {}", self.obc_hrs_alive)?;
        writeln!(f, "obc_hrs_wo_reset: {}", self.obc_hrs_wo_reset)?;
        writeln!(f, "obc_reset_counter: {}", self.obc_reset_counter)?;
        writeln!(f, "obc_sw_wdt: {}", self.obc_sw_wdt)?;
        writeln!(f, "obc_temp_1: {:.2}", self.obc_temp_1)?;
        writeln!(f, "obc_temp_2: {:.2}", self.obc_temp_2)?;
        writeln!(f, "obc_temp_3: {:.2}", self.obc_temp_3)?;
        writeln!(f, "dep_ant_deployed: {}", self.dep_ant_deployed)?;
        writeln!(f, "dep_ant_tries: {}", self.dep_ant_tries)?;
        writeln!(f, "dep_date_time: {}", self.dep_date_time)?;
        writeln!(f, "rtc_date_time: {}", self.rtc_date_time)?;
        writeln!(f, "com_count_tm: {}", self.com_count_tm)?;
        writeln!(f, "com_count_tc: {}", self.com_count_tc)?;
        writeln!(f, "com_last_tc: {}", self.com_last_tc)?;
        writeln!(f, "com_freq: {}", self.com_freq)?;
        writeln!(f, "com_tx_pwr: {}", self.com_tx_pwr)?;
        writeln!(f, "com_baud: {}", self.com_baud)?;
        writeln!(f, "com_mode: {}", self.com_mode)?;
        writeln!(f, "com_bcn_period: {}", self.com_bcn_period)?;
        writeln!(f, "fpl_last: {}", self.fpl_last)?;
        writeln!(f, "fpl_queue: {}", self.fpl_queue)?;
        writeln!(
            f,
            "ads_acc: [{:.3}, {:.3}, {:.3}]",
            self.ads_acc[0], self.ads_acc[1], self.ads_acc[2]
        )?;
        writeln!(
            f,
            "ads_mag: [{:.3}, {:.3}, {:.3}]",
            self.ads_mag[0], self.ads_mag[1], self.ads_mag[2]
        )?;
        writeln!(f, "eps_vbatt: {}", self.eps_vbatt)?;
        writeln!(f, "eps_cur_sun: {}", self.eps_cur_sun)?;
        writeln!(f, "eps_cur_sys: {}", self.eps_cur_sys)?;
        writeln!(f, "eps_temp_bat0: {}", self.eps_temp_bat0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode_prefix;

    #[test]
    fn test_encoded_len_matches_writer() {
        let snapshot = StatusSnapshot::default();
        let mut buf = [0u8; StatusSnapshot::ENCODED_LEN];
        let mut writer = WireWriter::new(&mut buf);
        snapshot.encode_into(&mut writer);
        assert_eq!(writer.position(), StatusSnapshot::ENCODED_LEN);
    }

    #[test]
    fn test_field_offsets() {
        let snapshot = StatusSnapshot {
            obc_opmode: 2,
            obc_hrs_alive: 0x0102_0304,
            eps_temp_bat0: -5,
            ..StatusSnapshot::default()
        };
        let bytes = snapshot.to_bytes();

        assert_eq!(bytes[0], 2);
        assert_eq!(&bytes[2..6], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(&bytes[110..114], &(-5i32).to_le_bytes());
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let snapshot = StatusSnapshot {
            com_count_tm: 41,
            ads_mag: [0.5, -0.25, 1.0],
            ..StatusSnapshot::default()
        };
        let mut buf = [0xEEu8; 150];
        buf[..StatusSnapshot::ENCODED_LEN].copy_from_slice(&snapshot.to_bytes());

        let decoded: StatusSnapshot = decode_prefix(&buf).unwrap();
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn test_display_lists_every_field() {
        let rendered = StatusSnapshot::default().to_string();
        assert_eq!(rendered.lines().count(), 29);
        assert!(rendered.starts_with("obc_opmode: 0\n"));
    }
}
