//! Precaution Knowledge Base

use climate_core::Disease;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::EngineError;

/// Precautions per disease, read-only once built
#[derive(Debug, Clone, PartialEq)]
pub struct PrecautionBook {
    entries: HashMap<Disease, Vec<String>>,
}

impl PrecautionBook {
    /// Precautions for a disease, falling back to the "No Disease" entry
    pub fn for_disease(&self, disease: Disease) -> &[String] {
        self.entries
            .get(&disease)
            .or_else(|| self.entries.get(&Disease::NoDisease))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Built-in entries overridden by a JSON file of `label -> [precaution]`
    pub fn from_json_file(path: &Path) -> Result<Self, EngineError> {
        let raw = std::fs::read_to_string(path).map_err(|source| EngineError::PrecautionsIo {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed: HashMap<String, Vec<String>> =
            serde_json::from_str(&raw).map_err(|source| EngineError::PrecautionsParse {
                path: path.to_path_buf(),
                source,
            })?;

        let mut book = Self::default();
        for (label, precautions) in parsed {
            let disease =
                Disease::from_label(&label).ok_or_else(|| EngineError::UnknownDisease(label.clone()))?;
            book.entries.insert(disease, precautions);
        }

        info!("Loaded precautions from {}", path.display());
        Ok(book)
    }
}

fn entry(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for PrecautionBook {
    fn default() -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            Disease::Malaria,
            entry(&[
                "Use mosquito nets treated with insecticide while sleeping",
                "Apply mosquito repellent (DEET-based) on exposed skin",
                "Wear long-sleeved shirts and long pants, especially during dusk and dawn",
                "Eliminate standing water around your home to reduce mosquito breeding",
                "Consult a doctor immediately if you experience high fever with chills",
                "Take antimalarial prophylaxis if traveling to endemic areas",
            ]),
        );
        entries.insert(
            Disease::Dengue,
            entry(&[
                "Eliminate all sources of stagnant water (flower pots, tires, containers)",
                "Use mosquito coils and electric vapor mats indoors",
                "Wear protective clothing during daytime (Aedes mosquitoes are day-biters)",
                "Stay hydrated with ORS (Oral Rehydration Solution) if symptoms appear",
                "Monitor platelet count if fever persists beyond 2 days",
                "Avoid aspirin and ibuprofen; use only paracetamol for fever",
            ]),
        );
        entries.insert(
            Disease::Typhoid,
            entry(&[
                "Drink only boiled or purified water",
                "Avoid eating raw vegetables and unpeeled fruits from street vendors",
                "Wash hands thoroughly with soap before eating and after using the toilet",
                "Get vaccinated with typhoid vaccine if in endemic area",
                "Avoid eating food from unhygienic places during monsoon season",
                "Complete the full course of prescribed antibiotics if diagnosed",
            ]),
        );
        entries.insert(
            Disease::Asthma,
            entry(&[
                "Wear an N95 mask when AQI exceeds 150",
                "Keep emergency inhaler (bronchodilator) accessible at all times",
                "Avoid outdoor exercise when air quality is poor",
                "Install an air purifier with HEPA filter in your bedroom",
                "Monitor local AQI levels daily and plan outdoor activities accordingly",
                "Avoid known triggers: smoke, dust, pollen, and strong perfumes",
            ]),
        );
        entries.insert(
            Disease::ViralFever,
            entry(&[
                "Rest adequately and get at least 8 hours of sleep",
                "Stay well-hydrated with warm fluids (soups, herbal teas, warm water)",
                "Take paracetamol for fever; avoid self-medicating with antibiotics",
                "Avoid sudden temperature changes (AC to outdoor heat)",
                "Boost immunity with Vitamin C-rich foods (citrus fruits, amla)",
                "Isolate if symptoms persist to prevent spreading to family members",
            ]),
        );
        entries.insert(
            Disease::Cholera,
            entry(&[
                "Drink only treated or boiled water",
                "Wash hands frequently, especially before eating and after toilet use",
                "Avoid raw or undercooked seafood",
                "Use ORS immediately if diarrhea begins; dehydration is the primary risk",
                "Seek medical attention urgently for severe watery diarrhea",
                "Ensure proper sanitation and waste disposal in your locality",
            ]),
        );
        entries.insert(
            Disease::HeatStroke,
            entry(&[
                "Stay indoors between 11 AM and 4 PM during extreme heat",
                "Drink at least 3-4 liters of water daily",
                "Wear light-colored, loose-fitting, breathable clothing",
                "Apply cold compresses to neck, armpits, and groin if body temp rises",
                "Avoid intense physical exertion during peak heat hours",
                "Seek emergency medical help if someone collapses or stops sweating",
            ]),
        );
        entries.insert(
            Disease::NoDisease,
            entry(&[
                "Continue maintaining good hygiene practices",
                "Stay hydrated and eat a balanced diet",
                "Monitor weather conditions and air quality regularly",
                "Keep your living space clean and pest-free",
                "Get regular health check-ups",
                "Stay physically active with daily exercise",
            ]),
        );
        Self { entries }
    }
}
