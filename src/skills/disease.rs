//! Static disease reference table.

use log::debug;

/// One entry of the disease table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disease {
    pub keyword: &'static str,
    pub name: &'static str,
    pub symptoms: &'static str,
    pub cause: &'static str,
    pub treatment: &'static str,
    pub severity: &'static str,
}

impl Disease {
    /// Renders the reply block for this entry.
    pub fn describe(&self) -> String {
        format!(
            "🩺 *{}*\n- **Symptoms**: {}\n- **Cause**: {}\n- **Treatment**: {}\n- **Severity**: {}",
            self.name, self.symptoms, self.cause, self.treatment, self.severity
        )
    }
}

/// Entries in priority order; the first keyword found in a message wins.
pub const DISEASES: [Disease; 7] = [
    Disease {
        keyword: "cold",
        name: "Common Cold",
        symptoms: "Runny nose, sore throat, cough, congestion, slight body aches.",
        cause: "Caused by a viral infection (usually rhinovirus).",
        treatment: "Rest, hydration, and over-the-counter cold medications.",
        severity: "Mild",
    },
    Disease {
        keyword: "fever",
        name: "Fever",
        symptoms: "High body temperature, chills, sweating, headache, body aches.",
        cause: "Usually due to an infection (bacterial or viral).",
        treatment: "Stay hydrated, take paracetamol or ibuprofen, and rest.",
        severity: "Mild to Moderate",
    },
    Disease {
        keyword: "covid",
        name: "COVID-19",
        symptoms: "Fever, cough, fatigue, shortness of breath, loss of taste or smell.",
        cause: "Caused by SARS-CoV-2 virus, spreads through droplets.",
        treatment: "Isolation, monitoring symptoms, and seeking medical help if needed.",
        severity: "Varies from Mild to Severe",
    },
    Disease {
        keyword: "malaria",
        name: "Malaria",
        symptoms: "Fever, chills, vomiting, headache, muscle pain.",
        cause: "Spread by Anopheles mosquitoes carrying Plasmodium parasite.",
        treatment: "Antimalarial medications prescribed by doctors.",
        severity: "Moderate to Severe",
    },
    Disease {
        keyword: "diabetes",
        name: "Diabetes",
        symptoms: "Increased thirst, frequent urination, fatigue, blurred vision.",
        cause: "High blood sugar due to insulin issues (Type 1 or 2).",
        treatment: "Managed with medication, insulin, diet control, and exercise.",
        severity: "Chronic",
    },
    Disease {
        keyword: "hypertension",
        name: "Hypertension",
        symptoms: "Often silent, may include headache, shortness of breath, or nosebleeds.",
        cause: "High pressure in the arteries. Risk factor for heart disease.",
        treatment: "Lifestyle changes and antihypertensive drugs.",
        severity: "Chronic",
    },
    Disease {
        keyword: "headache",
        name: "Headache",
        symptoms: "Pain in head, scalp, or neck. Can be dull or sharp.",
        cause: "Stress, dehydration, sinus issues, eye strain, or more serious causes.",
        treatment: "Rest, hydration, and over-the-counter pain relievers.",
        severity: "Mild to Moderate",
    },
];

/// Looks up the first table entry whose keyword occurs in the message.
pub fn disease_info(message: &str) -> Option<String> {
    let message = message.to_lowercase();
    let entry = DISEASES.iter().find(|d| message.contains(d.keyword))?;
    debug!("Disease lookup matched '{}'", entry.keyword);
    Some(entry.describe())
}
