use std::collections::BTreeMap;

use strum::Display;

use crate::ir::{EndpointModel, SchemaModel, SpecialCase};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnalysisStats {
  pub schemas_analyzed: usize,
  pub synthetic_models: usize,
  pub properties_resolved: usize,
  pub endpoints_analyzed: usize,
  pub cycles_detected: usize,
  pub cycle_details: Vec<Vec<String>>,
  pub special_cases: BTreeMap<SpecialCase, usize>,
  pub warnings: Vec<AnalysisWarning>,
}

impl AnalysisStats {
  pub fn record_model(&mut self, model: &SchemaModel) {
    if model.synthetic {
      self.synthetic_models += 1;
    } else {
      self.schemas_analyzed += 1;
    }
    self.properties_resolved += model.properties.len();
    for special_case in &model.special_cases {
      *self.special_cases.entry(*special_case).or_default() += 1;
    }
  }

  pub fn record_models<'m>(&mut self, models: impl IntoIterator<Item = &'m SchemaModel>) {
    for model in models {
      self.record_model(model);
    }
  }

  pub fn record_endpoints(&mut self, endpoints: &[EndpointModel]) {
    self.endpoints_analyzed += endpoints.len();
  }

  pub fn record_cycle(&mut self, cycle: Vec<String>) {
    self.cycles_detected += 1;
    self.cycle_details.push(cycle);
  }

  pub fn record_cycles(&mut self, cycles: Vec<Vec<String>>) {
    for cycle in cycles {
      self.record_cycle(cycle);
    }
  }

  pub fn record_warning(&mut self, warning: AnalysisWarning) {
    self.warnings.push(warning);
  }

  pub fn special_case_count(&self, special_case: SpecialCase) -> usize {
    self.special_cases.get(&special_case).copied().unwrap_or_default()
  }
}

/// Non-fatal findings worth surfacing to whoever renders the model.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum AnalysisWarning {
  #[strum(to_string = "Schema '{schema_name}': union has no discriminator mapping, members are tried in order")]
  HeuristicUnion { schema_name: String },
  #[strum(to_string = "Schema '{schema_name}': discriminator value '{value}' maps to '{member}', which is not an object model")]
  DiscriminatorMemberNotObject {
    schema_name: String,
    value: String,
    member: String,
  },
}
