mod serialization;
