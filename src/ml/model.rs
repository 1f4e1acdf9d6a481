use anyhow::{bail, Result};
use burn::{
    nn::{
        attention::{MhaInput, MultiHeadAttention, MultiHeadAttentionConfig},
        loss::CrossEntropyLossConfig,
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        Initializer,
        LayerNorm, LayerNormConfig,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::{gelu, tanh},
};

/// XLM-RoBERTa hyperparameters. Field names follow the hub's
/// `config.json` so that file deserialises straight into this struct;
/// unknown keys in it are ignored. Defaults are `xlm-roberta-base`.
// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
#[derive(Config, Debug)]
pub struct XlmRobertaConfig {
    #[config(default = 250002)]
    pub vocab_size: usize,
    #[config(default = 768)]
    pub hidden_size: usize,
    #[config(default = 12)]
    pub num_hidden_layers: usize,
    #[config(default = 12)]
    pub num_attention_heads: usize,
    #[config(default = 3072)]
    pub intermediate_size: usize,
    #[config(default = 0.1)]
    pub hidden_dropout_prob: f64,
    #[config(default = 0.1)]
    pub attention_probs_dropout_prob: f64,
    #[config(default = 514)]
    pub max_position_embeddings: usize,
    #[config(default = 1)]
    pub type_vocab_size: usize,
    #[config(default = 1e-5)]
    pub layer_norm_eps: f64,
    #[config(default = 1)]
    pub pad_token_id: usize,
    #[config(default = 2)]
    pub num_labels: usize,
}

impl XlmRobertaConfig {
    /// Longest input the position table can index. Positions start
    /// at `pad_token_id + 1`, so two slots of the table are never used.
    pub fn max_sequence_length(&self) -> usize {
        self.max_position_embeddings.saturating_sub(self.pad_token_id + 1)
    }

    pub fn check_sequence_length(&self, max_length: usize) -> Result<()> {
        if max_length > self.max_sequence_length() {
            bail!(
                "max_length {} exceeds the model's limit of {} tokens",
                max_length,
                self.max_sequence_length()
            );
        }
        Ok(())
    }

    /// Randomly initialised classifier. The encoder part is normally
    /// overwritten with pretrained weights right after.
    pub fn init<B: Backend>(&self, device: &B::Device) -> XlmRobertaClassifier<B> {
        XlmRobertaClassifier {
            encoder: self.init_encoder(device),
            head:    self.init_head(device),
        }
    }

    pub fn init_encoder<B: Backend>(&self, device: &B::Device) -> XlmRobertaEncoder<B> {
        let embeddings = Embeddings {
            word_embeddings:       EmbeddingConfig::new(self.vocab_size, self.hidden_size).init(device),
            position_embeddings:   EmbeddingConfig::new(self.max_position_embeddings, self.hidden_size).init(device),
            token_type_embeddings: EmbeddingConfig::new(self.type_vocab_size, self.hidden_size).init(device),
            layer_norm:            self.layer_norm(device),
            dropout:               DropoutConfig::new(self.hidden_dropout_prob).init(),
            pad_token_id:          self.pad_token_id,
        };
        let layers = (0..self.num_hidden_layers)
            .map(|_| self.init_layer(device))
            .collect();
        XlmRobertaEncoder { embeddings, layers }
    }

    fn init_layer<B: Backend>(&self, device: &B::Device) -> EncoderLayer<B> {
        EncoderLayer {
            attention: MultiHeadAttentionConfig::new(self.hidden_size, self.num_attention_heads)
                .with_dropout(self.attention_probs_dropout_prob)
                .init(device),
            attention_norm: self.layer_norm(device),
            intermediate:   LinearConfig::new(self.hidden_size, self.intermediate_size).init(device),
            output:         LinearConfig::new(self.intermediate_size, self.hidden_size).init(device),
            output_norm:    self.layer_norm(device),
            dropout:        DropoutConfig::new(self.hidden_dropout_prob).init(),
        }
    }

    // Same initialisation the reference implementation uses for a
    // fresh classification head: N(0, 0.02) weights, zero bias.
    fn init_head<B: Backend>(&self, device: &B::Device) -> ClassificationHead<B> {
        let init = Initializer::Normal { mean: 0.0, std: 0.02 };
        ClassificationHead {
            dense: LinearConfig::new(self.hidden_size, self.hidden_size)
                .with_initializer(init.clone())
                .init(device),
            out_proj: LinearConfig::new(self.hidden_size, self.num_labels)
                .with_initializer(init)
                .init(device),
            dropout: DropoutConfig::new(self.hidden_dropout_prob).init(),
        }
    }

    fn layer_norm<B: Backend>(&self, device: &B::Device) -> LayerNorm<B> {
        LayerNormConfig::new(self.hidden_size)
            .with_epsilon(self.layer_norm_eps)
            .init(device)
    }
}

#[derive(Module, Debug)]
pub struct Embeddings<B: Backend> {
    pub word_embeddings:       Embedding<B>,
    pub position_embeddings:   Embedding<B>,
    pub token_type_embeddings: Embedding<B>,
    pub layer_norm:            LayerNorm<B>,
    pub dropout:               Dropout,
    pub pad_token_id:          usize,
}

impl<B: Backend> Embeddings<B> {
    /// input_ids, attention_mask: [batch, seq_len] → [batch, seq_len, hidden]
    pub fn forward(&self, input_ids: Tensor<B, 2, Int>, attention_mask: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        let [batch_size, seq_len] = input_ids.dims();
        let device = input_ids.device();

        // Position ids start after the padding index; padded slots get
        // the padding index itself. Sequences are right-padded, so the
        // running count of real tokens is just the column index + 1.
        let positions = Tensor::<B, 1, Int>::arange(0..seq_len as i64, &device)
            .unsqueeze::<2>()
            .expand([batch_size, seq_len])
            .add_scalar(1)
            .mul(attention_mask)
            .add_scalar(self.pad_token_id as i64);
        let token_types = Tensor::<B, 2, Int>::zeros([batch_size, seq_len], &device);

        let x = self.word_embeddings.forward(input_ids)
            + self.position_embeddings.forward(positions)
            + self.token_type_embeddings.forward(token_types);
        self.dropout.forward(self.layer_norm.forward(x))
    }
}

/// Post-norm transformer block: attention → add & norm → GELU FFN → add & norm
#[derive(Module, Debug)]
pub struct EncoderLayer<B: Backend> {
    pub attention:      MultiHeadAttention<B>,
    pub attention_norm: LayerNorm<B>,
    pub intermediate:   Linear<B>,
    pub output:         Linear<B>,
    pub output_norm:    LayerNorm<B>,
    pub dropout:        Dropout,
}

impl<B: Backend> EncoderLayer<B> {
    /// mask_pad: [batch, seq_len], true on padding positions
    pub fn forward(&self, x: Tensor<B, 3>, mask_pad: Tensor<B, 2, Bool>) -> Tensor<B, 3> {
        let attn_output = self
            .attention
            .forward(MhaInput::self_attn(x.clone()).mask_pad(mask_pad))
            .context;
        let x = self.attention_norm.forward(x + self.dropout.forward(attn_output));

        let ffn_out = self.output.forward(gelu(self.intermediate.forward(x.clone())));
        self.output_norm.forward(x + self.dropout.forward(ffn_out))
    }
}

#[derive(Module, Debug)]
pub struct XlmRobertaEncoder<B: Backend> {
    pub embeddings: Embeddings<B>,
    pub layers:     Vec<EncoderLayer<B>>,
}

impl<B: Backend> XlmRobertaEncoder<B> {
    /// → hidden states [batch, seq_len, hidden]
    pub fn forward(&self, input_ids: Tensor<B, 2, Int>, attention_mask: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        let mask_pad = attention_mask.clone().equal_elem(0);
        let mut x = self.embeddings.forward(input_ids, attention_mask);
        for layer in &self.layers {
            x = layer.forward(x, mask_pad.clone());
        }
        x
    }
}

/// Sentence-level head over the `<s>` position:
/// dropout → dense → tanh → dropout → out_proj
#[derive(Module, Debug)]
pub struct ClassificationHead<B: Backend> {
    pub dense:    Linear<B>,
    pub out_proj: Linear<B>,
    pub dropout:  Dropout,
}

impl<B: Backend> ClassificationHead<B> {
    pub fn forward(&self, hidden: Tensor<B, 3>) -> Tensor<B, 2> {
        let [batch_size, _, hidden_size] = hidden.dims();
        let first = hidden
            .slice([0..batch_size, 0..1, 0..hidden_size])
            .reshape([batch_size, hidden_size]);

        let x = tanh(self.dense.forward(self.dropout.forward(first)));
        self.out_proj.forward(self.dropout.forward(x))
    }
}

#[derive(Module, Debug)]
pub struct XlmRobertaClassifier<B: Backend> {
    pub encoder: XlmRobertaEncoder<B>,
    pub head:    ClassificationHead<B>,
}

pub struct ClassificationOutput<B: Backend> {
    /// [1], mean cross-entropy over the batch
    pub loss: Tensor<B, 1>,
}

impl<B: Backend> XlmRobertaClassifier<B> {
    /// input_ids, attention_mask: [batch, seq_len] → logits [batch, num_labels]
    pub fn forward(&self, input_ids: Tensor<B, 2, Int>, attention_mask: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        let hidden = self.encoder.forward(input_ids, attention_mask);
        self.head.forward(hidden)
    }

    pub fn forward_loss(
        &self,
        input_ids:      Tensor<B, 2, Int>,
        attention_mask: Tensor<B, 2, Int>,
        labels:         Tensor<B, 1, Int>,
    ) -> ClassificationOutput<B> {
        let logits = self.forward(input_ids, attention_mask);
        let loss = CrossEntropyLossConfig::new()
            .init(&logits.device())
            .forward(logits, labels);
        ClassificationOutput { loss }
    }

    /// Arg-max class per example → [batch]
    pub fn predict(&self, input_ids: Tensor<B, 2, Int>, attention_mask: Tensor<B, 2, Int>) -> Tensor<B, 1, Int> {
        self.forward(input_ids, attention_mask)
            .argmax(1)
            .flatten::<1>(0, 1)
    }
}
