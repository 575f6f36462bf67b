use serde::{Deserialize, Serialize};

/// Fixed wrapping applied to every user instruction before it is sent to the
/// image model. History views strip it again with [`display_prompt`].
pub const PROMPT_PREAMBLE: &str = "Edit this real estate photo: ";
pub const PROMPT_POSTAMBLE: &str = ". Maintain photorealistic quality, proper lighting, and professional real estate photography standards. Keep the original architecture and layout intact while making the requested improvements.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PromptCategory {
    Staging,
    Lighting,
    Declutter,
    Exterior,
    Repair,
}

impl PromptCategory {
    pub const ALL: [PromptCategory; 5] = [
        PromptCategory::Staging,
        PromptCategory::Lighting,
        PromptCategory::Declutter,
        PromptCategory::Exterior,
        PromptCategory::Repair,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PromptCategory::Staging => "staging",
            PromptCategory::Lighting => "lighting",
            PromptCategory::Declutter => "declutter",
            PromptCategory::Exterior => "exterior",
            PromptCategory::Repair => "repair",
        }
    }

    pub fn parse(s: &str) -> Option<PromptCategory> {
        match s {
            "staging" => Some(PromptCategory::Staging),
            "lighting" => Some(PromptCategory::Lighting),
            "declutter" => Some(PromptCategory::Declutter),
            "exterior" => Some(PromptCategory::Exterior),
            "repair" => Some(PromptCategory::Repair),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct PromptTemplate {
    pub id: &'static str,
    pub label: &'static str,
    pub prompt: &'static str,
    pub category: PromptCategory,
}

/// Canned Norwegian real-estate editing instructions shown in the editor.
pub const REAL_ESTATE_PROMPTS: [PromptTemplate; 16] = [
    PromptTemplate {
        id: "scandinavian-design",
        label: "Skandinavisk design",
        prompt: "Møbler rommet med skandinavisk design - lyse trefarger, minimalistisk stil, funksjonelle møbler, naturlige materialer. Ikke plasser møbler foran dører eller vinduer. Bruk hvite og beige farger med enkle, rene linjer",
        category: PromptCategory::Staging,
    },
    PromptTemplate {
        id: "modern-norwegian",
        label: "Moderne norsk",
        prompt: "Legg til moderne norske møbler med lyse farger, rene linjer og naturlige tekstiler. Inkluder designklassikere og funksjonelle løsninger som passer norske hjem",
        category: PromptCategory::Staging,
    },
    PromptTemplate {
        id: "cozy-interior",
        label: "Koselig interiør",
        prompt: "Skap et koselig interiør med myke tekstiler, ulltepper, puter og komfortable møbler. Legg til stearinlys og varme elementer for hygge-stemning",
        category: PromptCategory::Staging,
    },
    PromptTemplate {
        id: "minimalist-nordic",
        label: "Minimalistisk nordisk",
        prompt: "Innred med minimalistisk nordisk stil - få, men velvalgte møbler, mye luft og rom, naturlige materialer som tre og lin",
        category: PromptCategory::Staging,
    },
    PromptTemplate {
        id: "natural-nordic-light",
        label: "Naturlig nordisk lys",
        prompt: "Forbedre med naturlig, nordisk lys - lyst og luftig atmosfære, myke skygger, behagelig dagslys som fremhever rommets beste sider",
        category: PromptCategory::Lighting,
    },
    PromptTemplate {
        id: "warm-lighting",
        label: "Varm belysning",
        prompt: "Legg til varm, innbydende belysning som passer norske hjem. Skap en koselig atmosfære med godt balansert lys",
        category: PromptCategory::Lighting,
    },
    PromptTemplate {
        id: "bright-daylight",
        label: "Klart dagslys",
        prompt: "Optimaliser dagslys for å vise rommets beste sider, fjern mørke hjørner, skap en frisk og innbydende atmosfære",
        category: PromptCategory::Lighting,
    },
    PromptTemplate {
        id: "scandinavian-minimalism",
        label: "Skandinavisk minimalisme",
        prompt: "Fjern unødvendige gjenstander, skap ren skandinavisk minimalisme med fokus på rom, lys og enkelhet",
        category: PromptCategory::Declutter,
    },
    PromptTemplate {
        id: "clean-surfaces",
        label: "Rene flater",
        prompt: "Rydd alle overflater, fjern personlige eiendeler og rot, la rommets arkitektur og linjer komme frem",
        category: PromptCategory::Declutter,
    },
    PromptTemplate {
        id: "organized-space",
        label: "Organisert rom",
        prompt: "Organiser rommet pent og ryddig, skap balanse og harmoni, behold kun essensielle elementer",
        category: PromptCategory::Declutter,
    },
    PromptTemplate {
        id: "norwegian-garden",
        label: "Norsk hage",
        prompt: "Forbedre hagen med norske planter, velstelt plen, naturstein og elementer som passer det norske klimaet",
        category: PromptCategory::Exterior,
    },
    PromptTemplate {
        id: "nordic-facade",
        label: "Nordisk fasade",
        prompt: "Oppfrisk fasaden med rene linjer og moderne norsk stil, fjern skitt og slitasje, fremhev arkitektoniske detaljer",
        category: PromptCategory::Exterior,
    },
    PromptTemplate {
        id: "entrance-appeal",
        label: "Innbydende inngang",
        prompt: "Gjør inngangspartiet innbydende og velstelt med pent arrangerte planter, ren dørmatte og god belysning",
        category: PromptCategory::Exterior,
    },
    PromptTemplate {
        id: "wall-refresh",
        label: "Oppfrisk vegger",
        prompt: "Reparer vegger, fjern skader og sprekker, mal i lyse, moderne farger som hvit, lys grå eller varm beige",
        category: PromptCategory::Repair,
    },
    PromptTemplate {
        id: "modern-upgrade",
        label: "Moderne oppgradering",
        prompt: "Oppgrader utdaterte elementer til moderne skandinavisk standard, bytt gamle armaturer og håndtak",
        category: PromptCategory::Repair,
    },
    PromptTemplate {
        id: "surface-renewal",
        label: "Forny overflater",
        prompt: "Forny overflater med friske, lyse farger typisk for nordisk design, fjern slitasje og merker",
        category: PromptCategory::Repair,
    },
];

pub fn by_category(category: PromptCategory) -> Vec<&'static PromptTemplate> {
    REAL_ESTATE_PROMPTS
        .iter()
        .filter(|t| t.category == category)
        .collect()
}

/// Wraps the user instruction in the fixed real-estate editing frame.
pub fn compose_instruction(prompt: &str) -> String {
    format!("{}{}{}", PROMPT_PREAMBLE, prompt, PROMPT_POSTAMBLE)
}

/// Undoes [`compose_instruction`] for history display.
pub fn display_prompt(stored: &str) -> String {
    stored
        .replacen(PROMPT_PREAMBLE, "", 1)
        .replacen(PROMPT_POSTAMBLE, "", 1)
}

pub fn combine_prompts(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(". ")
}

/// Appends room-specific seasoning to an instruction when the room type is known.
pub fn enhance_for_room(base: &str, room_type: Option<&str>) -> String {
    let extra = match room_type {
        Some("kitchen") => "moderne hvitevarer, rene benkeplater, organiserte skap, skandinavisk kjøkkendesign",
        Some("bedroom") => "komfortabel seng med hvitt sengetøy, myk belysning, ryddig garderobe, rolig atmosfære",
        Some("bathroom") => "rene armaturer, spa-atmosfære, friske håndklær, minimalistisk design",
        Some("living-room") => "komfortable sittemøbler, naturlige materialer, god romfølelse, hyggelig atmosfære",
        Some("dining-room") => "elegant borddekking, godt lys over spisebordet, romslig følelse, skandinaviske designmøbler",
        Some("office") => "organisert arbeidsområde, profesjonelt utseende, god belysning, minimalistisk stil",
        Some("garage") => "rent gulv, organisert lagring, god belysning, ryddig",
        _ => return base.to_string(),
    };
    format!("{}, {}", base, extra)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_covers_every_category() {
        assert_eq!(by_category(PromptCategory::Staging).len(), 4);
        assert_eq!(by_category(PromptCategory::Lighting).len(), 3);
        assert_eq!(by_category(PromptCategory::Declutter).len(), 3);
        assert_eq!(by_category(PromptCategory::Exterior).len(), 3);
        assert_eq!(by_category(PromptCategory::Repair).len(), 3);
        assert_eq!(REAL_ESTATE_PROMPTS.len(), 16);
    }

    #[test]
    fn compose_then_display_round_trips() {
        let composed = compose_instruction("remove clutter");
        assert!(composed.starts_with(PROMPT_PREAMBLE));
        assert!(composed.ends_with(PROMPT_POSTAMBLE));
        assert_eq!(display_prompt(&composed), "remove clutter");
    }

    #[test]
    fn display_leaves_plain_text_alone() {
        assert_eq!(display_prompt("just a prompt"), "just a prompt");
    }

    #[test]
    fn combine_skips_empty_parts() {
        assert_eq!(
            combine_prompts(&["lys opp rommet", "", "fjern rot"]),
            "lys opp rommet. fjern rot"
        );
        assert_eq!(combine_prompts(&[]), "");
    }

    #[test]
    fn room_enhancement_applies_only_to_known_rooms() {
        let enhanced = enhance_for_room("rydd rommet", Some("kitchen"));
        assert!(enhanced.starts_with("rydd rommet, moderne hvitevarer"));
        assert_eq!(enhance_for_room("rydd rommet", Some("attic")), "rydd rommet");
        assert_eq!(enhance_for_room("rydd rommet", None), "rydd rommet");
    }

    #[test]
    fn category_parse_accepts_known_names_only() {
        assert_eq!(PromptCategory::parse("staging"), Some(PromptCategory::Staging));
        assert_eq!(PromptCategory::parse("unknown"), None);
    }
}
