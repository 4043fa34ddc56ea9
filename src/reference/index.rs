//! Queryable rate tables built from a reference dataset.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use super::dataset::{
    BASE_RATES, DAS_ZIPS, EDAS_ZIPS, REMOTE_ZIPS, ReferenceDataset, Sheet, SheetSchema, ZONE_CHART,
};
use crate::error::{EngineError, EngineResult};
use crate::models::{PREFIX_LENGTH, ZIP_LENGTH, ZipCode, Zone, is_digits};

/// Which delivery-area surcharge lists a destination appears on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SurchargeFlags {
    /// Destination is in a Delivery Area Surcharge area.
    pub is_das: bool,
    /// Destination is in an Extended Delivery Area Surcharge area.
    pub is_edas: bool,
    /// Destination is in a Remote Area Surcharge area.
    pub is_remote: bool,
}

impl SurchargeFlags {
    /// Returns true if any flag is set.
    pub fn any(&self) -> bool {
        self.is_das || self.is_edas || self.is_remote
    }
}

/// A rate-table row where a heavier tier costs less than a lighter one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonotonicViolation {
    /// Zone column of the violation.
    pub zone: Zone,
    /// The lighter tier.
    pub lighter_tier: Decimal,
    /// The lighter tier's rate.
    pub lighter_rate: Decimal,
    /// The heavier tier.
    pub heavier_tier: Decimal,
    /// The heavier tier's (lower) rate.
    pub heavier_rate: Decimal,
}

/// A matched weight tier and its rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseRateEntry {
    /// The tier the weight rounded up to.
    pub tier: Decimal,
    /// Base rate for the zone at this tier.
    pub rate: Decimal,
}

/// Zips and zip prefixes belonging to one surcharge list.
#[derive(Debug, Clone, Default)]
struct ZipSet {
    zips: HashSet<String>,
    prefixes: HashSet<String>,
}

impl ZipSet {
    fn contains(&self, zip: &ZipCode) -> bool {
        self.zips.contains(zip.as_str()) || self.prefixes.contains(zip.prefix())
    }

    fn len(&self) -> usize {
        self.zips.len() + self.prefixes.len()
    }
}

/// Read-only lookup structures for one carrier's rate workbook.
///
/// Built once per analysis with [`RateTableIndex::load`] and shared by every
/// row calculation.
///
/// # Example
///
/// ```no_run
/// use parcel_rate_engine::models::{ZipCode, Zone};
/// use parcel_rate_engine::reference::RateTableIndex;
/// use rust_decimal::Decimal;
///
/// let index = RateTableIndex::load_dir("./data/reference")?;
/// let zone = index.zone("100", &ZipCode::normalize("04652").unwrap())?;
/// let rate = index.base_rate(zone, Decimal::from(5))?;
/// println!("zone {zone}: ${rate}");
/// # Ok::<(), parcel_rate_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RateTableIndex {
    tiers: Vec<Decimal>,
    rates: Vec<[Decimal; Zone::COUNT]>,
    zone_chart: HashMap<(String, String), Zone>,
    das: ZipSet,
    edas: ZipSet,
    remote: ZipSet,
}

impl RateTableIndex {
    /// Validates a dataset against the sheet schema and indexes it.
    ///
    /// # Errors
    ///
    /// `DataLoad` naming the sheet if a required sheet is missing, its
    /// headers differ from the schema, or any cell fails to parse.
    pub fn load(dataset: &ReferenceDataset) -> EngineResult<Self> {
        let (tiers, rates) = parse_base_rates(schema_sheet(dataset, &BASE_RATES)?)?;
        let zone_chart = parse_zone_chart(schema_sheet(dataset, &ZONE_CHART)?)?;
        let das = parse_zip_list(schema_sheet(dataset, &DAS_ZIPS)?)?;
        let edas = parse_zip_list(schema_sheet(dataset, &EDAS_ZIPS)?)?;
        let remote = parse_zip_list(schema_sheet(dataset, &REMOTE_ZIPS)?)?;

        let index = Self {
            tiers,
            rates,
            zone_chart,
            das,
            edas,
            remote,
        };

        info!(
            weight_tiers = index.tiers.len(),
            zone_chart_entries = index.zone_chart.len(),
            das_entries = index.das.len(),
            edas_entries = index.edas.len(),
            remote_entries = index.remote.len(),
            "Indexed reference rate tables"
        );

        for violation in index.monotonic_violations() {
            warn!(
                zone = %violation.zone,
                lighter_tier = %violation.lighter_tier,
                lighter_rate = %violation.lighter_rate,
                heavier_tier = %violation.heavier_tier,
                heavier_rate = %violation.heavier_rate,
                "Base rate decreases with weight"
            );
        }

        Ok(index)
    }

    /// Reads a dataset directory and indexes it.
    pub fn load_dir<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        Self::load(&ReferenceDataset::load_dir(path)?)
    }

    /// Returns the base rate for a zone at the smallest tier holding `weight`.
    ///
    /// # Errors
    ///
    /// `RateNotFound` when `weight` is below the lightest tier or above the
    /// heaviest one. Tiers are positive, so this covers weights of zero or less.
    pub fn base_rate(&self, zone: Zone, weight: Decimal) -> EngineResult<Decimal> {
        self.base_rate_entry(zone, weight).map(|entry| entry.rate)
    }

    /// Like [`base_rate`](Self::base_rate), also returning the matched tier.
    pub fn base_rate_entry(&self, zone: Zone, weight: Decimal) -> EngineResult<BaseRateEntry> {
        let not_found = || EngineError::RateNotFound { zone, weight };

        if self.tiers.first().is_none_or(|lightest| weight < *lightest) {
            return Err(not_found());
        }

        let position = self.tiers.partition_point(|tier| *tier < weight);
        let tier = *self.tiers.get(position).ok_or_else(not_found)?;
        let rate = self.rates[position][zone.index()];

        Ok(BaseRateEntry { tier, rate })
    }

    /// Returns the zone from an origin prefix to a destination zip.
    ///
    /// A chart entry for the full five-digit destination wins over an entry
    /// for its three-digit prefix.
    ///
    /// # Errors
    ///
    /// `ZoneNotFound` if neither entry exists.
    pub fn zone(&self, origin_prefix: &str, destination: &ZipCode) -> EngineResult<Zone> {
        let origin = origin_prefix.to_string();
        self.zone_chart
            .get(&(origin.clone(), destination.as_str().to_string()))
            .or_else(|| {
                self.zone_chart
                    .get(&(origin, destination.prefix().to_string()))
            })
            .copied()
            .ok_or_else(|| EngineError::ZoneNotFound {
                origin: origin_prefix.to_string(),
                destination: destination.to_string(),
            })
    }

    /// Returns which surcharge lists a destination zip is on.
    ///
    /// Never fails: a zip that cannot be normalized is on no list.
    pub fn surcharge_flags(&self, destination_zip: &str) -> SurchargeFlags {
        match ZipCode::normalize(destination_zip) {
            Some(zip) => SurchargeFlags {
                is_das: self.das.contains(&zip),
                is_edas: self.edas.contains(&zip),
                is_remote: self.remote.contains(&zip),
            },
            None => SurchargeFlags::default(),
        }
    }

    /// Returns the weight tiers, lightest first.
    pub fn weight_tiers(&self) -> &[Decimal] {
        &self.tiers
    }

    /// Returns the heaviest tabulated weight.
    pub fn max_weight(&self) -> Option<Decimal> {
        self.tiers.last().copied()
    }

    /// Lists adjacent tiers where the heavier one is cheaper.
    pub fn monotonic_violations(&self) -> Vec<MonotonicViolation> {
        let mut violations = Vec::new();

        for (position, pair) in self.rates.windows(2).enumerate() {
            for zone in Zone::all() {
                let lighter_rate = pair[0][zone.index()];
                let heavier_rate = pair[1][zone.index()];
                if heavier_rate < lighter_rate {
                    violations.push(MonotonicViolation {
                        zone,
                        lighter_tier: self.tiers[position],
                        lighter_rate,
                        heavier_tier: self.tiers[position + 1],
                        heavier_rate,
                    });
                }
            }
        }

        violations
    }
}

/// Looks up a sheet and checks its headers and row widths.
fn schema_sheet<'a>(dataset: &'a ReferenceDataset, schema: &SheetSchema) -> EngineResult<&'a Sheet> {
    let sheet = dataset
        .sheet(schema.name)
        .ok_or_else(|| EngineError::data_load(schema.name, "sheet is missing"))?;

    if sheet.columns.len() != schema.columns.len()
        || sheet
            .columns
            .iter()
            .zip(schema.columns)
            .any(|(actual, expected)| actual.trim() != *expected)
    {
        return Err(EngineError::data_load(
            schema.name,
            format!(
                "expected columns {:?}, found {:?}",
                schema.columns, sheet.columns
            ),
        ));
    }

    for (row_number, row) in sheet.rows.iter().enumerate() {
        if row.len() != schema.columns.len() {
            return Err(EngineError::data_load(
                schema.name,
                format!(
                    "row {} has {} cells, expected {}",
                    row_number + 1,
                    row.len(),
                    schema.columns.len()
                ),
            ));
        }
    }

    Ok(sheet)
}

fn parse_decimal(sheet: &str, row_number: usize, column: &str, value: &str) -> EngineResult<Decimal> {
    Decimal::from_str(value).map_err(|_| {
        EngineError::data_load(
            sheet,
            format!("row {row_number} column '{column}': '{value}' is not a number"),
        )
    })
}

fn parse_base_rates(sheet: &Sheet) -> EngineResult<(Vec<Decimal>, Vec<[Decimal; Zone::COUNT]>)> {
    let name = BASE_RATES.name;
    if sheet.rows.is_empty() {
        return Err(EngineError::data_load(name, "no weight tiers"));
    }

    let mut tiers: Vec<Decimal> = Vec::with_capacity(sheet.rows.len());
    let mut rates = Vec::with_capacity(sheet.rows.len());

    for (row_index, row) in sheet.rows.iter().enumerate() {
        let row_number = row_index + 1;
        let tier = parse_decimal(name, row_number, BASE_RATES.columns[0], row[0].as_str())?;

        if tier <= Decimal::ZERO {
            return Err(EngineError::data_load(
                name,
                format!("row {row_number}: weight tier {tier} must be positive"),
            ));
        }
        if let Some(previous) = tiers.last().filter(|previous| tier <= **previous) {
            return Err(EngineError::data_load(
                name,
                format!("row {row_number}: weight tier {tier} does not increase on {previous}"),
            ));
        }

        let mut zone_rates = [Decimal::ZERO; Zone::COUNT];
        for (offset, cell) in row[1..].iter().enumerate() {
            let column = BASE_RATES.columns[offset + 1];
            let rate = parse_decimal(name, row_number, column, cell.as_str())?;
            if rate < Decimal::ZERO {
                return Err(EngineError::data_load(
                    name,
                    format!("row {row_number} column '{column}': rate {rate} is negative"),
                ));
            }
            zone_rates[offset] = rate;
        }

        tiers.push(tier);
        rates.push(zone_rates);
    }

    Ok((tiers, rates))
}

fn parse_zone_chart(sheet: &Sheet) -> EngineResult<HashMap<(String, String), Zone>> {
    let name = ZONE_CHART.name;
    let mut chart = HashMap::with_capacity(sheet.rows.len());

    for (row_index, row) in sheet.rows.iter().enumerate() {
        let row_number = row_index + 1;
        let origin = row[0].as_str();
        let destination = row[1].as_str();
        let zone_cell = row[2].as_str();

        if !is_digits(origin, PREFIX_LENGTH) {
            return Err(EngineError::data_load(
                name,
                format!("row {row_number}: origin prefix '{origin}' must be 3 digits"),
            ));
        }
        if !is_digits(destination, PREFIX_LENGTH) && !is_digits(destination, ZIP_LENGTH) {
            return Err(EngineError::data_load(
                name,
                format!("row {row_number}: destination '{destination}' must be 3 or 5 digits"),
            ));
        }
        let zone = zone_cell
            .parse::<u8>()
            .ok()
            .and_then(Zone::new)
            .ok_or_else(|| {
                EngineError::data_load(
                    name,
                    format!("row {row_number}: zone '{zone_cell}' must be 1 through 8"),
                )
            })?;

        let key = (origin.to_string(), destination.to_string());
        if chart.insert(key, zone).is_some() {
            return Err(EngineError::data_load(
                name,
                format!("row {row_number}: duplicate entry for {origin} -> {destination}"),
            ));
        }
    }

    Ok(chart)
}

fn parse_zip_list(sheet: &Sheet) -> EngineResult<ZipSet> {
    let mut set = ZipSet::default();

    for (row_index, row) in sheet.rows.iter().enumerate() {
        let zip = row[0].as_str();
        if is_digits(zip, ZIP_LENGTH) {
            set.zips.insert(zip.to_string());
        } else if is_digits(zip, PREFIX_LENGTH) {
            set.prefixes.insert(zip.to_string());
        } else {
            return Err(EngineError::data_load(
                &sheet.name,
                format!("row {}: '{zip}' must be a 3 or 5 digit zip", row_index + 1),
            ));
        }
    }

    Ok(set)
}
