use serde::{Deserialize, Serialize};

use crate::domain::types::MaterialId;

code_enum! {
    MaterialVisibility {
        Public => ("P", "Público"),
        Internal => ("I", "Interno"),
    }
}

code_enum! {
    MaterialCategory {
        VisualIdentity => ("IDV", "Identidade visual"),
        Signage => ("SIN", "Sinalização"),
        Posters => ("POP", "Cartazes"),
        Training => ("TRE", "Treinamento"),
        Procedures => ("PRO", "Procedimentos"),
        Other => ("OUT", "Outros"),
    }
}

/// Downloadable support material (signage, training slides...).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Material {
    pub id: MaterialId,
    pub title: String,
    pub description: Option<String>,
    pub visibility: MaterialVisibility,
    pub category: MaterialCategory,
    pub file: Option<String>,
}
