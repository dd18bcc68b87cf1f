//! The 27-fold nakshatra division of the sidereal ecliptic.
//!
//! Each nakshatra spans 13 deg 20' (360/27 deg). In Vimshottari every
//! nakshatra is ruled by a graha, cycling through the nine dasha lords three
//! times from Ashwini (Ketu) to Revati (Buddh). The Moon's nakshatra at birth
//! selects the first mahadasha and how much of it remains.

use serde::{Deserialize, Serialize};

use crate::error::DashaError;
use crate::graha::Graha;
use crate::util::normalize_360;

/// Span of one nakshatra in the 27-scheme: 360/27 = 13.3333... degrees.
pub const NAKSHATRA_SPAN_27: f64 = 360.0 / 27.0;

/// Offsets within this many degrees of a nakshatra boundary snap onto it.
pub const NAKSHATRA_BOUNDARY_EPS_DEG: f64 = 1e-10;

/// Number of nakshatras in the sidereal cycle.
pub const NAKSHATRA_COUNT: usize = 27;

/// The 27 nakshatras from Ashwini to Revati.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Nakshatra {
    Ashwini,
    Bharani,
    Krittika,
    Rohini,
    Mrigashira,
    Ardra,
    Punarvasu,
    Pushya,
    Ashlesha,
    Magha,
    PurvaPhalguni,
    UttaraPhalguni,
    Hasta,
    Chitra,
    Swati,
    Vishakha,
    Anuradha,
    Jyeshtha,
    Mula,
    PurvaAshadha,
    UttaraAshadha,
    Shravana,
    Dhanishtha,
    Shatabhisha,
    PurvaBhadrapada,
    UttaraBhadrapada,
    Revati,
}

/// All 27 nakshatras in order (0 = Ashwini, 26 = Revati).
pub const ALL_NAKSHATRAS_27: [Nakshatra; NAKSHATRA_COUNT] = [
    Nakshatra::Ashwini,
    Nakshatra::Bharani,
    Nakshatra::Krittika,
    Nakshatra::Rohini,
    Nakshatra::Mrigashira,
    Nakshatra::Ardra,
    Nakshatra::Punarvasu,
    Nakshatra::Pushya,
    Nakshatra::Ashlesha,
    Nakshatra::Magha,
    Nakshatra::PurvaPhalguni,
    Nakshatra::UttaraPhalguni,
    Nakshatra::Hasta,
    Nakshatra::Chitra,
    Nakshatra::Swati,
    Nakshatra::Vishakha,
    Nakshatra::Anuradha,
    Nakshatra::Jyeshtha,
    Nakshatra::Mula,
    Nakshatra::PurvaAshadha,
    Nakshatra::UttaraAshadha,
    Nakshatra::Shravana,
    Nakshatra::Dhanishtha,
    Nakshatra::Shatabhisha,
    Nakshatra::PurvaBhadrapada,
    Nakshatra::UttaraBhadrapada,
    Nakshatra::Revati,
];

/// Vimshottari lords in nakshatra order; repeats every 9 nakshatras.
const VIMSHOTTARI_LORDS: [Graha; 9] = [
    Graha::Ketu,
    Graha::Shukra,
    Graha::Surya,
    Graha::Chandra,
    Graha::Mangal,
    Graha::Rahu,
    Graha::Guru,
    Graha::Shani,
    Graha::Buddh,
];

impl Nakshatra {
    /// Name of the nakshatra.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ashwini => "Ashwini",
            Self::Bharani => "Bharani",
            Self::Krittika => "Krittika",
            Self::Rohini => "Rohini",
            Self::Mrigashira => "Mrigashira",
            Self::Ardra => "Ardra",
            Self::Punarvasu => "Punarvasu",
            Self::Pushya => "Pushya",
            Self::Ashlesha => "Ashlesha",
            Self::Magha => "Magha",
            Self::PurvaPhalguni => "Purva Phalguni",
            Self::UttaraPhalguni => "Uttara Phalguni",
            Self::Hasta => "Hasta",
            Self::Chitra => "Chitra",
            Self::Swati => "Swati",
            Self::Vishakha => "Vishakha",
            Self::Anuradha => "Anuradha",
            Self::Jyeshtha => "Jyeshtha",
            Self::Mula => "Mula",
            Self::PurvaAshadha => "Purva Ashadha",
            Self::UttaraAshadha => "Uttara Ashadha",
            Self::Shravana => "Shravana",
            Self::Dhanishtha => "Dhanishtha",
            Self::Shatabhisha => "Shatabhisha",
            Self::PurvaBhadrapada => "Purva Bhadrapada",
            Self::UttaraBhadrapada => "Uttara Bhadrapada",
            Self::Revati => "Revati",
        }
    }

    /// 0-based index (Ashwini=0 .. Revati=26).
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Vimshottari dasha lord of this nakshatra.
    pub const fn lord(self) -> Graha {
        VIMSHOTTARI_LORDS[(self as usize) % VIMSHOTTARI_LORDS.len()]
    }
}

/// Result of a nakshatra lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NakshatraInfo {
    /// The nakshatra.
    pub nakshatra: Nakshatra,
    /// 0-based index (0 = Ashwini).
    pub nakshatra_index: u8,
    /// Vimshottari lord of the nakshatra.
    pub lord: Graha,
    /// Decimal degrees within the nakshatra [0.0, 13.333...).
    pub degrees_in_nakshatra: f64,
}

/// Determine the nakshatra from a sidereal ecliptic longitude.
///
/// Fails with [`DashaError::InvalidInput`] for NaN or infinite longitudes.
pub fn nakshatra_from_longitude(sidereal_lon_deg: f64) -> Result<NakshatraInfo, DashaError> {
    if !sidereal_lon_deg.is_finite() {
        return Err(DashaError::input(format!(
            "longitude must be finite, got {sidereal_lon_deg}"
        )));
    }
    let lon = normalize_360(sidereal_lon_deg);
    let mut nak_idx = ((lon / NAKSHATRA_SPAN_27).floor() as u8).min(26);
    let mut degrees = lon - (nak_idx as f64) * NAKSHATRA_SPAN_27;
    // At a boundary the floor can land on either side of it.
    if NAKSHATRA_SPAN_27 - degrees < NAKSHATRA_BOUNDARY_EPS_DEG {
        nak_idx = (nak_idx + 1) % NAKSHATRA_COUNT as u8;
        degrees = 0.0;
    }
    let degrees = degrees.clamp(0.0, NAKSHATRA_SPAN_27);
    let nakshatra = ALL_NAKSHATRAS_27[nak_idx as usize];
    Ok(NakshatraInfo {
        nakshatra,
        nakshatra_index: nak_idx,
        lord: nakshatra.lord(),
        degrees_in_nakshatra: degrees,
    })
}
