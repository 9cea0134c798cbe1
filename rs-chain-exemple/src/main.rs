use std::collections::HashMap;

use log::info;
use rs_chain_core::{Chain, ChainError};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=debug shows vocabulary rebuilds and training summaries
    env_logger::init();

    // Train a word-level chain from a short text
    let text = "the cat sat on the mat and the cat ate the rat that ran";
    let words: Vec<&str> = text.split_whitespace().collect();

    let mut words_chain: Chain<&str> = Chain::new();
    words_chain.fit(&words, None, false)?;
    info!("word chain has {} states", words_chain.len());

    // Generate 5 sentences of up to 8 words.
    // 'adjust' stops early on a word that was never followed by anything
    for i in 0..5 {
        let start = words_chain.random_state().copied().unwrap_or("the");
        let generated = words_chain.forward(&start, 8, true)?;
        println!("Generated sentence {}: {} {}", i + 1, start, generated.join(" "));
    }

    // Without 'adjust', a dead end is an error
    match words_chain.forward(&"ran", 3, false) {
        Ok(states) => println!("'ran' continued with {:?}", states),
        Err(ChainError::SamplingDeadEnd { state, .. }) => println!("Dead end reached at {}", state),
        Err(e) => return Err(e.into()),
    }

    // Starting from a word the chain never saw
    match words_chain.forward(&"dog", 3, true) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("{}", e),
    }

    // Load a chain from similarity-shaped weights:
    // each codon maps to the other codons with a score in [0, 1]
    let similarities: HashMap<String, HashMap<String, f64>> = HashMap::from([
        ("AAT".to_owned(), HashMap::from([("AAG".to_owned(), 0.8), ("ATG".to_owned(), 0.6), ("GGC".to_owned(), 0.2)])),
        ("AAG".to_owned(), HashMap::from([("AAT".to_owned(), 0.8), ("ATG".to_owned(), 0.6), ("GGC".to_owned(), 0.4)])),
        ("ATG".to_owned(), HashMap::from([("AAT".to_owned(), 0.6), ("AAG".to_owned(), 0.6), ("GGC".to_owned(), 0.2)])),
        ("GGC".to_owned(), HashMap::from([("AAT".to_owned(), 0.2), ("AAG".to_owned(), 0.4), ("ATG".to_owned(), 0.2)])),
    ]);

    let mut codons: Chain<String> = Chain::new();
    // 'weighted' multiplies each score by the destination label length
    codons.load(similarities, None, false, true)?;

    let start = "ATG".to_owned();
    for (state, weight) in codons.states().iter().zip(codons.row(&start)?) {
        println!("ATG -> {}: {}", state, weight);
    }

    let sequence = codons.forward(&start, 10, true)?;
    println!("Generated codons: {}{}", start, sequence.concat());

    // A copy evolves independently from its original
    let mut copy = codons.copy();
    copy.clear();
    println!("Original built: {}, copy built: {}", codons.built(), copy.built());

    Ok(())
}
