mod dependencies;
mod strategy;
mod support;
mod type_resolver;
