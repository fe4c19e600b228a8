use postag::{Corpus, MarkovModel, MaxEntModel, MemmOptions, MmOptions, Model, Tagger, Trainer};

const CORPUS: &str = "The\tDT\ndog\tNN\nruns\tVBZ\n.\t.\n
A\tDT\ncat\tNN\nsleeps\tVBZ\n.\t.\n
I\tPRP\ncan\tMD\nrun\tVB\n.\t.\n
The\tDT\ncan\tNN\nleaks\tVBZ\n.\t.\n";

fn main() -> postag::Result<()> {
    env_logger::init();

    let corpus = Corpus::from(CORPUS.lines());
    let sentence = ["The", "cat", "runs", "."];

    let mut mm = MarkovModel::new();
    mm.train(
        &corpus,
        &MmOptions {
            min_token_occurrences: 1,
            ..Default::default()
        },
    )?;
    println!("mm:   {:?}", mm.decode(&sentence));

    let mut memm = MaxEntModel::new();
    memm.train(
        &corpus,
        &MemmOptions {
            min_token_occurrences: 0,
            min_feature_occurrences: 0,
            ..Default::default()
        },
    )?;
    println!("memm: {:?}", memm.decode(&sentence));

    let mut text = Vec::new();
    memm.write(&mut text)?;
    println!("{}", String::from_utf8_lossy(&text));
    Ok(())
}
