// src/models/report.rs

use serde::Deserialize;
use utoipa::IntoParams;

/// Parâmetros comuns dos relatórios em PDF.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    /// Colunas separadas por vírgula (ex.: `code,head,phone`). Vazio usa o padrão.
    pub columns: Option<String>,
    /// Mesmo filtro de texto da listagem.
    pub q: Option<String>,
}

/// Filtro de texto das listagens (`?q=`).
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FilterQuery {
    pub q: Option<String>,
}
